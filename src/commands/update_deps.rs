use std::env;

use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::ui;

const MANUAL_COMPLETION_ENV: &str = "complete_update_dependency_manually";

fn is_manual_completion() -> bool {
    env::var(MANUAL_COMPLETION_ENV).as_deref() == Ok("true")
}

/// Update one go dependency on the update branch and commit the result.
pub fn update(ctx: &CommandContext, dep: Option<&str>) -> Result<()> {
    ctx.runner.git(
        "Allow fetching other branches",
        &[
            "config",
            "--replace-all",
            "remote.origin.fetch",
            "+refs/heads/*:refs/remotes/origin/*",
        ],
    )?;
    ctx.runner
        .git("Ensure origin/main is up to date", &["fetch", "origin", "main"])?;
    ctx.runner.git(
        "Ensure go.mod/go.sum are untouched",
        &["checkout", "--", "go.mod", "go.sum"],
    )?;

    if !is_manual_completion() {
        ctx.runner
            .git("Sync with main", &["merge", "--ff-only", "origin/main"])?;
        let diff = ctx
            .runner
            .output_lines("Ensure we are synced", "git", &["diff", "origin/main"])?;
        if !diff.is_empty() {
            return Err(ReleaseError::config(format!(
                "update branch has diverged from main. automated merges won't work until this is fixed. Diff: {}",
                diff.join("\n")
            )));
        }
    }

    let dep = updated_dependency(dep)?;
    ctx.runner.run("Update dependency", "go", &["get", &dep])?;

    let changed =
        ctx.runner
            .output_lines("check if there's a change", "git", &["diff", "--name-only", "go.mod"])?;
    if changed.len() != 1 || changed[0] != "go.mod" {
        ui::status("requested dependency did not result in change");
        return Ok(());
    }
    println!("attempting to update to {}", dep);

    ctx.runner.run("Tidy go.sum", "go", &["mod", "tidy"])?;
    ctx.runner
        .git("Add go mod changes", &["add", "go.mod", "go.sum"])?;
    ctx.runner.git(
        "Commit go.mod changes",
        &["commit", "-m", &format!("Updating dependency {}", dep)],
    )?;
    Ok(())
}

/// Merge a committed dependency update into main and push both branches.
pub fn complete(ctx: &CommandContext) -> Result<()> {
    let update_branch = ctx.current_branch()?;

    // go get can touch go.mod after the commit we made
    ctx.runner.git(
        "Ensure go.mod/go.sum are untouched",
        &["checkout", "--", "go.mod", "go.sum"],
    )?;
    let commit = ctx
        .runner
        .output_line("get git SHA", "git", &["rev-parse", "--short=12", "HEAD"])?;

    if !is_manual_completion() {
        ctx.runner.git("Checkout main", &["checkout", "main"])?;
    } else {
        ctx.runner
            .git("Checkout actual branch", &["checkout", &update_branch])?;
    }
    ctx.runner
        .git("Merge in changes", &["merge", "--ff-only", &commit])?;
    ctx.runner.git("Push to remote", &["push"])?;
    ctx.runner
        .git("Push update branch", &["push", "origin", &update_branch])?;
    Ok(())
}

fn updated_dependency(arg: Option<&str>) -> Result<String> {
    if let Some(dep) = arg {
        if !dep.is_empty() {
            return Ok(dep.to_string());
        }
    }
    match env::var("UPDATED_DEPENDENCY") {
        Ok(dep) if !dep.is_empty() => Ok(dep),
        _ => Err(ReleaseError::config("no updated dependency provided")),
    }
}
