use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};
use crate::lang::Language;

/// Complete configuration for release-ci.
///
/// Everything has a default so the tool runs without a config file; a
/// `releaseci.toml` overrides the pieces a project family cares about
/// (bot identities, upstream org, artifactory coordinates).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub artifactory: ArtifactoryConfig,
}

fn default_git_username() -> String {
    "release-ci".to_string()
}

fn default_git_email() -> String {
    "release-ci@users.noreply.github.com".to_string()
}

fn default_ssh_key_env() -> String {
    "ci_ssh_key".to_string()
}

fn default_ssh_key_file() -> String {
    "github_deploy_key".to_string()
}

fn default_gpg_key_env() -> String {
    "ci_gpg_key".to_string()
}

fn default_gpg_key_id_env() -> String {
    "ci_gpg_key_id".to_string()
}

/// Identity the tool assumes when it commits, tags and pushes from CI.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IdentityConfig {
    #[serde(default = "default_git_username")]
    pub git_username: String,

    #[serde(default = "default_git_email")]
    pub git_email: String,

    /// Repository owners git configuration is allowed to run for; empty
    /// allows all owners.
    #[serde(default)]
    pub allowed_owners: Vec<String>,

    #[serde(default = "default_ssh_key_env")]
    pub ssh_key_env: String,

    #[serde(default = "default_ssh_key_file")]
    pub ssh_key_file: String,

    #[serde(default = "default_gpg_key_env")]
    pub gpg_key_env: String,

    #[serde(default = "default_gpg_key_id_env")]
    pub gpg_key_id_env: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            git_username: default_git_username(),
            git_email: default_git_email(),
            allowed_owners: Vec::new(),
            ssh_key_env: default_ssh_key_env(),
            ssh_key_file: default_ssh_key_file(),
            gpg_key_env: default_gpg_key_env(),
            gpg_key_id_env: default_gpg_key_id_env(),
        }
    }
}

fn default_release_bot() -> String {
    "release-ci".to_string()
}

fn default_dependency_bot() -> String {
    "dependabot[bot]".to_string()
}

/// Settings for release-note generation.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotesConfig {
    /// Author name of the automation bot whose commits are filtered out
    #[serde(default = "default_release_bot")]
    pub release_bot: String,

    /// Author name of the dependency-update bot
    #[serde(default = "default_dependency_bot")]
    pub dependency_bot: String,

    /// Substring selecting upstream requirements in go.mod; empty disables
    /// the dependency section
    #[serde(default)]
    pub upstream_filter: String,

    /// Project whose old-boundary correction walks past merge bubbles
    #[serde(default)]
    pub primary_project: String,

    /// GitHub org used to build compare links
    #[serde(default)]
    pub github_org: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        NotesConfig {
            release_bot: default_release_bot(),
            dependency_bot: default_dependency_bot(),
            upstream_filter: String::new(),
            primary_project: String::new(),
            github_org: String::new(),
        }
    }
}

/// Artifact bundling settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PackageConfig {
    /// Prefix for release bundle names; defaults to the repository
    /// directory name when empty
    #[serde(default)]
    pub name: String,
}

/// Artifactory publishing settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ArtifactoryConfig {
    #[serde(default)]
    pub url: String,

    /// Uploads go to `<repo_prefix>-staging` from main and
    /// `<repo_prefix>-snapshot` from other branches
    #[serde(default)]
    pub repo_prefix: String,

    #[serde(default)]
    pub build_name: String,
}

/// Runtime options threaded into every command, sourced from the global
/// command-line flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub verbose: bool,
    pub quiet: bool,
    pub dry_run: bool,
    pub language: Option<Language>,
}

/// Load configuration from an explicit path, `./releaseci.toml`, the user
/// config directory, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./releaseci.toml").exists() {
        fs::read_to_string("./releaseci.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("releaseci.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("invalid releaseci.toml: {}", e)))
}
