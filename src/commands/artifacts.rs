//! Release artifact handling shared by the publish commands: discovery of
//! built binaries under the release directory and archive creation.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{ReleaseError, Result};

/// One releasable binary found under `release/<arch>/<os>/`.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Binary name with any `.exe` suffix stripped
    pub name: String,
    /// File name as found on disk
    pub source_name: String,
    pub source_path: PathBuf,
    pub arch: String,
    pub os: String,
}

impl Artifact {
    pub fn bundle(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }
}

/// Walk `release/<arch>/<os>/` collecting releasable files. Archives from
/// earlier runs (`.gz`) are skipped.
pub fn collect_artifacts(release_dir: &Path) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();

    for arch_entry in read_dirs(release_dir)? {
        let arch = arch_entry
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        for os_entry in read_dirs(&arch_entry)? {
            let os = os_entry
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            for file in read_files(&os_entry)? {
                let source_name = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                if source_name.ends_with(".gz") {
                    continue;
                }
                let name = source_name
                    .strip_suffix(".exe")
                    .unwrap_or(&source_name)
                    .to_string();
                artifacts.push(Artifact {
                    name,
                    source_name,
                    source_path: file,
                    arch: arch.clone(),
                    os: os.clone(),
                });
            }
        }
    }
    Ok(artifacts)
}

fn read_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in dir.read_dir().map_err(|e| {
        ReleaseError::config(format!("failed to read dir {}: {}", dir.display(), e))
    })? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn read_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in dir.read_dir().map_err(|e| {
        ReleaseError::config(format!("failed to read dir {}: {}", dir.display(), e))
    })? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write a gzipped tarball containing the given files under the given
/// archive-internal names.
pub fn tar_gz(archive: &Path, entries: &[(PathBuf, String)]) -> Result<()> {
    let output = File::create(archive)?;
    let encoder = GzEncoder::new(output, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (source, name) in entries {
        let mut file = File::open(source)?;
        builder.append_file(name, &mut file)?;
    }

    builder.into_inner()?.finish()?;
    Ok(())
}

/// Flat tarball: every file lands at the archive root under its own name.
pub fn tar_gz_flat(archive: &Path, files: &[PathBuf]) -> Result<()> {
    let entries: Vec<(PathBuf, String)> = files
        .iter()
        .map(|f| {
            let name = f
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            (f.clone(), name)
        })
        .collect();
    tar_gz(archive, &entries)
}

/// Tarball of artifacts laid out as `<arch>/<os>/<file>`.
pub fn tar_gz_artifacts(archive: &Path, artifacts: &[Artifact]) -> Result<()> {
    let entries: Vec<(PathBuf, String)> = artifacts
        .iter()
        .map(|a| {
            (
                a.source_path.clone(),
                format!("{}/{}/{}", a.arch, a.os, a.source_name),
            )
        })
        .collect();
    tar_gz(archive, &entries)
}

/// Zip archive of artifacts, flat layout. Used for Windows bundles.
pub fn zip_artifacts(archive: &Path, artifacts: &[Artifact]) -> Result<()> {
    let output = File::create(archive)?;
    let mut zip = zip::ZipWriter::new(output);

    for artifact in artifacts {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(artifact.source_name.clone(), options)
            .map_err(|e| ReleaseError::command("write zip archive", e.to_string()))?;
        let mut file = File::open(&artifact.source_path)?;
        io::copy(&mut file, &mut zip)?;
    }
    zip.finish()
        .map_err(|e| ReleaseError::command("write zip archive", e.to_string()))?;
    Ok(())
}
