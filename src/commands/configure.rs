use std::env;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::ui;

/// Provision the CI git identity: deploy key, optional GPG signing key,
/// user/email and ssh remote.
pub fn run(ctx: &CommandContext) -> Result<()> {
    let identity = &ctx.config.identity;

    if !identity.allowed_owners.is_empty() {
        match env::var("GITHUB_REPOSITORY_OWNER") {
            Ok(owner) if identity.allowed_owners.contains(&owner) => {}
            _ => {
                ui::warn("Running outside the configured owner orgs. Not attempting to configure git.");
                return Ok(());
            }
        }
    }

    write_deploy_key(ctx)?;
    ensure_gitignore_entry(&identity.ssh_key_file)?;
    configure_gpg_signing(ctx)?;

    ctx.runner
        .git("set git username", &["config", "user.name", &identity.git_username])?;
    ctx.runner
        .git("set git email", &["config", "user.email", &identity.git_email])?;
    ctx.runner.git(
        "set ssh config",
        &[
            "config",
            "core.sshCommand",
            &format!("ssh -i {}", identity.ssh_key_file),
        ],
    )?;

    // Pushes must go over ssh with the deploy key
    if let Ok(repo) = env::var("GITHUB_REPOSITORY") {
        if !repo.is_empty() {
            let url = format!("git@github.com:{}.git", repo);
            ctx.runner
                .git("set remote to ssh", &["remote", "set-url", "origin", &url])?;
        }
    }
    Ok(())
}

fn write_deploy_key(ctx: &CommandContext) -> Result<()> {
    let identity = &ctx.config.identity;
    let encoded = match env::var(&identity.ssh_key_env) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            return Err(ReleaseError::config(format!(
                "unable to read ssh key from env var {}",
                identity.ssh_key_env
            )))
        }
    };
    let key = BASE64.decode(encoded.trim()).map_err(|e| {
        ReleaseError::config(format!("unable to decode ssh key: {}", e))
    })?;
    fs::write(&identity.ssh_key_file, key)?;
    restrict_permissions(&identity.ssh_key_file)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &str) -> Result<()> {
    Ok(())
}

/// The deploy key must never end up in a commit.
fn ensure_gitignore_entry(key_file: &str) -> Result<()> {
    let gitignore = Path::new(".gitignore");
    let existing = if gitignore.exists() {
        fs::read_to_string(gitignore)?
    } else {
        String::new()
    };

    if existing.lines().any(|line| line.contains(key_file)) {
        ui::status(&format!(
            ".gitignore file already contains entry for {}",
            key_file
        ));
        return Ok(());
    }

    ui::status(&format!("adding {} to .gitignore", key_file));
    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(key_file);
    updated.push('\n');
    fs::write(gitignore, updated)?;
    Ok(())
}

fn configure_gpg_signing(ctx: &CommandContext) -> Result<()> {
    let identity = &ctx.config.identity;
    let key = match env::var(&identity.gpg_key_env) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            ui::warn(&format!(
                "unable to read gpg key from env var {}",
                identity.gpg_key_env
            ));
            return Ok(());
        }
    };

    match env::var(&identity.gpg_key_id_env) {
        Ok(key_id) if !key_id.is_empty() => {
            ctx.runner
                .git("set gpg key id", &["config", "user.signingkey", &key_id])?;
        }
        _ => {
            return Err(ReleaseError::config(format!(
                "unable to read gpg key id from env var {}",
                identity.gpg_key_id_env
            )))
        }
    }

    fs::write("gpg.key", key)?;
    restrict_permissions("gpg.key")?;
    let import = ctx.runner.run("import gpg key", "gpg", &["--import", "gpg.key"]);
    fs::remove_file("gpg.key")?;
    import?;

    ctx.runner
        .git("require gpg signed commits", &["config", "commit.gpgsign", "true"])?;
    ctx.runner
        .git("require gpg signed tags", &["config", "tag.gpgSign", "true"])?;
    Ok(())
}
