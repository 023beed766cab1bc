use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::ui;

/// Print the version the next release will carry. Run before tagging.
pub fn get_version(ctx: &mut CommandContext) -> Result<()> {
    ctx.eval_versions()?;

    let head_tags = ctx.head_tag_versions()?;
    if !head_tags.is_empty() {
        let names: Vec<String> = head_tags.iter().map(|v| v.to_string()).collect();
        ui::status(&format!("head already tagged with {}", names.join(", ")));
        return Ok(());
    }

    let next = ctx.next_version()?.clone();
    print!("{}", ctx.tag_name(&next));
    Ok(())
}

/// Print the most recent released version inside the window.
pub fn get_current_version(ctx: &mut CommandContext) -> Result<()> {
    ctx.eval_versions()?;

    let head_tags = ctx.head_tag_versions()?;
    if !head_tags.is_empty() {
        let names: Vec<String> = head_tags.iter().map(|v| v.to_string()).collect();
        ui::status(&format!("head already tagged with {}", names.join(", ")));
        return Ok(());
    }

    let current = ctx
        .current_version()?
        .cloned()
        .ok_or_else(|| ReleaseError::version("no released version for the current base version"))?;
    print!("{}", ctx.tag_name(&current));
    Ok(())
}

/// Print the branch being built.
pub fn get_branch(ctx: &CommandContext) -> Result<()> {
    print!("{}", ctx.current_branch()?);
    Ok(())
}
