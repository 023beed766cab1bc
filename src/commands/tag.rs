use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::lang::Language;
use crate::ui;

/// Tag HEAD with the next version and push the tag.
///
/// Safe to re-run: an already-tagged HEAD or a branch mismatch is a benign
/// exit, not an error.
pub fn run(ctx: &mut CommandContext, only_for_branch: Option<&str>) -> Result<()> {
    if let Some(wanted) = only_for_branch {
        let branch = ctx.current_branch()?;
        if branch != wanted {
            ui::status(&format!(
                "current branch {} doesn't match requested branch {}, so skipping",
                branch, wanted
            ));
            return Ok(());
        }
    }

    ctx.eval_versions()?;

    let head_tags = ctx.head_tag_versions()?;
    if !head_tags.is_empty() {
        let names: Vec<String> = head_tags.iter().map(|v| v.to_string()).collect();
        ui::status(&format!("head already tagged with {}", names.join(", ")));
        return Ok(());
    }

    let next = ctx.next_version()?.clone();

    if ctx.opts.language == Some(Language::Go) {
        let next_major = next.major();
        if next_major > 1 {
            let module = ctx.go_module()?;
            if !module.ends_with(&format!("/v{}", next_major)) {
                return Err(ReleaseError::config(format!(
                    "module version doesn't match next version: {}",
                    next_major
                )));
            }
        }
    }

    let tag = ctx.tag_name(&next);
    ctx.runner.git(
        "create tag",
        &["tag", "-a", &tag, "-m", &format!("Release {}", tag)],
    )?;
    ctx.runner
        .git("push tag to repo", &["push", "origin", &tag])?;
    Ok(())
}
