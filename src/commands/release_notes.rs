use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use crate::error::Result;

/// Extract one release section from a changelog file.
///
/// A section starts at a `# Release` heading and runs until the next one.
/// With no version given, the first (latest) section is extracted.
pub fn run(changelog: &str, version: Option<&str>, outfile: Option<&str>) -> Result<()> {
    let file = File::open(changelog)?;
    let mut out: Box<dyn Write> = match outfile {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    extract_release_notes(BufReader::new(file), version, &mut out)
}

fn extract_release_notes(
    reader: impl BufRead,
    version: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut start_found = false;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with("# Release") {
            if start_found {
                return Ok(());
            }
            let matches = match version {
                Some(v) => line.starts_with(&format!("# Release {}", v)),
                None => true,
            };
            if matches {
                start_found = true;
            }
        }
        if start_found {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
