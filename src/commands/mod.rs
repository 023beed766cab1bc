//! Subcommand implementations.
//!
//! Every command works off a [CommandContext] that carries the loaded
//! configuration, the runtime options from the global flags, the command
//! runner, and the version state resolved from the repository's tags.

pub mod artifacts;
pub mod configure;
pub mod notes;
pub mod package;
pub mod publish_artifactory;
pub mod publish_github;
pub mod release_notes;
pub mod tag;
pub mod trigger;
pub mod update_deps;
pub mod version_info;

use std::env;
use std::fs;

use crate::config::{Config, RunOptions};
use crate::error::{ReleaseError, Result};
use crate::exec::Runner;
use crate::lang;
use crate::version::{self, Resolution, SemanticVersion};

pub const DEFAULT_VERSION_FILE: &str = "./version";

pub struct CommandContext {
    pub config: Config,
    pub opts: RunOptions,
    pub runner: Runner,
    pub base_version: SemanticVersion,
    pub resolution: Option<Resolution>,
}

impl CommandContext {
    pub fn new(
        config: Config,
        opts: RunOptions,
        base_version: Option<&str>,
        base_version_file: &str,
    ) -> Result<Self> {
        let runner = Runner::new(opts.dry_run, opts.quiet);
        let base_version = read_base_version(base_version, base_version_file)?;
        Ok(CommandContext {
            config,
            opts,
            runner,
            base_version,
            resolution: None,
        })
    }

    /// Fetch remote tags and resolve the current and next version from the
    /// tag list.
    pub fn eval_versions(&mut self) -> Result<()> {
        self.runner
            .git_always("fetching git tags", &["fetch", "--tags"])?;
        let tags = self
            .runner
            .output_lines("list git tags", "git", &["tag", "--list"])?;
        let versions = version::parse_tag_versions(&tags);
        let resolution = version::resolve(&self.base_version, &versions);

        if !self.opts.quiet {
            let current = resolution
                .current
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!("current version: {}, next version: {}", current, resolution.next);
        }
        self.resolution = Some(resolution);
        Ok(())
    }

    fn resolution(&self) -> Result<&Resolution> {
        self.resolution
            .as_ref()
            .ok_or_else(|| ReleaseError::version("versions not evaluated yet"))
    }

    pub fn current_version(&self) -> Result<Option<&SemanticVersion>> {
        Ok(self.resolution()?.current.as_ref())
    }

    pub fn next_version(&self) -> Result<&SemanticVersion> {
        Ok(&self.resolution()?.next)
    }

    /// Version to publish artifacts under: the current release if one
    /// exists, otherwise the upcoming one (first build of a new minor).
    pub fn publish_version(&self) -> Result<&SemanticVersion> {
        let resolution = self.resolution()?;
        Ok(resolution.current.as_ref().unwrap_or(&resolution.next))
    }

    /// Version tags pointing at HEAD, if any.
    pub fn head_tag_versions(&self) -> Result<Vec<SemanticVersion>> {
        let tags =
            self.runner
                .output_lines("list tags at HEAD", "git", &["tag", "--points-at", "HEAD"])?;
        Ok(version::parse_tag_versions(&tags))
    }

    /// Branch being built: CI environment override first, local HEAD
    /// otherwise.
    pub fn current_branch(&self) -> Result<String> {
        if let Ok(branch) = env::var("GITHUB_HEAD_REF") {
            if !branch.is_empty() {
                return Ok(branch);
            }
        }
        if let Ok(branch) = env::var("GITHUB_REF_NAME") {
            if !branch.is_empty() {
                return Ok(branch);
            }
        }
        self.runner
            .output_line("get git branch", "git", &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn build_number(&self) -> String {
        match env::var("GITHUB_RUN_NUMBER") {
            Ok(n) if !n.is_empty() => n,
            _ => "0".to_string(),
        }
    }

    pub fn go_module(&self) -> Result<String> {
        self.runner
            .output_line("get go module", "go", &["list", "-m"])
    }

    /// Tag name for a version, honoring the language prefix rule.
    pub fn tag_name(&self, version: &SemanticVersion) -> String {
        lang::tag_name(self.opts.language, version)
    }
}

fn read_base_version(explicit: Option<&str>, file: &str) -> Result<SemanticVersion> {
    let raw = match explicit {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fs::read_to_string(file).map_err(|e| {
            ReleaseError::config(format!(
                "unable to load base version information from '{}': {}",
                file, e
            ))
        })?,
    };
    SemanticVersion::parse(raw.trim())
        .map_err(|_| ReleaseError::config(format!("Invalid base version {}", raw.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_base_version_explicit() {
        let v = read_base_version(Some("1.4.2"), DEFAULT_VERSION_FILE).unwrap();
        assert_eq!(v.to_string(), "1.4.2");
    }

    #[test]
    fn test_read_base_version_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.27.3").unwrap();
        let v = read_base_version(None, file.path().to_str().unwrap()).unwrap();
        assert_eq!(v.to_string(), "0.27.3");
    }

    #[test]
    fn test_read_base_version_missing_file() {
        let err = read_base_version(None, "./no-such-version-file").unwrap_err();
        assert!(err.to_string().contains("base version"));
    }

    #[test]
    fn test_read_base_version_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not-a-version").unwrap();
        let err = read_base_version(None, file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Invalid base version"));
    }
}
