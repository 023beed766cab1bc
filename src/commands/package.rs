use std::path::PathBuf;

use crate::commands::artifacts;
use crate::error::Result;
use crate::ui;

/// Package files into a flat tar.gz for release.
pub fn run(destination: &str, files: &[String]) -> Result<()> {
    let files: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    artifacts::tar_gz_flat(&PathBuf::from(destination), &files)?;
    ui::success(&format!("packaged {} file(s) into {}", files.len(), destination));
    Ok(())
}
