use std::env;

use serde_json::json;

use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::ui;

/// Trigger a dependency-update build in another repository by posting a
/// repository_dispatch event carrying the module version to pick up.
pub fn run(
    ctx: &mut CommandContext,
    target_repo: &str,
    target_branch: &str,
    token: Option<&str>,
) -> Result<()> {
    let token = match token {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => env::var("GITHUB_TOKEN").map_err(|_| {
            ReleaseError::config("no github token provided. Unable to trigger builds")
        })?,
    };

    ctx.eval_versions()?;
    let current = ctx
        .current_version()?
        .cloned()
        .ok_or_else(|| ReleaseError::version("no released version to trigger a build for"))?;

    let module = format!("{}@v{}", ctx.go_module()?, current);
    let body = json!({
        "event_type": "update-dependency",
        "client_payload": {
            "branch": target_branch,
            "updated_dependency": module,
        }
    });

    if ctx.opts.dry_run {
        ui::status(&format!(
            "dry run: would trigger build of {} to update to {}",
            target_repo, module
        ));
        return Ok(());
    }

    let url = format!("https://api.github.com/repos/{}/dispatches", target_repo);
    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&url)
        .header("Accept", "application/vnd.github+json")
        .header("Authorization", format!("Bearer {}", token))
        .header("User-Agent", "release-ci")
        .json(&body)
        .send()?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response.text().unwrap_or_default();
        return Err(ReleaseError::command(
            "trigger dependency-update build",
            format!("REST call returned {}: {}", status, detail),
        ));
    }

    ui::success(&format!(
        "successfully triggered build of {} to update to {}",
        target_repo, module
    ));
    Ok(())
}
