use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::changelog::{ChangeEntry, ChangeLogExtractor, NoteMode};
use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::git::Git2Repository;

/// Minimal view of a go.mod file: the module path and its requirements.
#[derive(Debug, PartialEq)]
pub struct GoModFile {
    pub module: String,
    pub requires: Vec<(String, String)>,
}

static MODULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^module\s+(\S+)").expect("module pattern"));
static REQUIRE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^require\s+(\S+)\s+(\S+)").expect("require pattern"));
static ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+(\S+)").expect("entry pattern"));

impl GoModFile {
    pub fn parse(content: &str) -> Result<GoModFile> {
        let mut module = None;
        let mut requires = Vec::new();
        let mut in_block = false;

        for raw in content.lines() {
            let line = raw.split("//").next().unwrap_or("").trim_end();
            if line.trim().is_empty() {
                continue;
            }
            if in_block {
                if line.trim() == ")" {
                    in_block = false;
                } else if let Some(captures) = ENTRY_PATTERN.captures(line) {
                    requires.push((captures[1].to_string(), captures[2].to_string()));
                }
                continue;
            }
            if let Some(captures) = MODULE_PATTERN.captures(line) {
                module = Some(captures[1].to_string());
            } else if line.trim() == "require (" || line.trim_start().starts_with("require (") {
                in_block = true;
            } else if let Some(captures) = REQUIRE_PATTERN.captures(line) {
                if &captures[1] != "(" {
                    requires.push((captures[1].to_string(), captures[2].to_string()));
                }
            }
        }

        Ok(GoModFile {
            module: module
                .ok_or_else(|| ReleaseError::config("go.mod has no module directive"))?,
            requires,
        })
    }

    pub fn require_version(&self, path: &str) -> Option<&str> {
        self.requires
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v.as_str())
    }
}

/// Project name from a module path like `github.com/org/project[/vN]`.
fn project_name(module_path: &str) -> Option<&str> {
    module_path.split('/').nth(2)
}

/// Restores the process working directory when dropped.
struct WorkingDir {
    original: PathBuf,
}

impl WorkingDir {
    fn change_to(path: &Path) -> Result<Self> {
        let original = env::current_dir()?;
        env::set_current_dir(path).map_err(|e| {
            ReleaseError::config(format!(
                "unable to switch to project directory '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(WorkingDir { original })
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

/// Build release notes: upstream dependency movements from go.mod plus the
/// commit/issue history for every project that changed.
pub fn run(ctx: &mut CommandContext, all_commits: bool, show_unchanged: bool) -> Result<()> {
    ctx.eval_versions()?;

    let current = ctx
        .current_version()?
        .cloned()
        .ok_or_else(|| ReleaseError::version("no released version to compare against"))?;
    let next = ctx.next_version()?.clone();

    let new_mod = GoModFile::parse(&fs::read_to_string("go.mod")?)?;
    let old_content = ctx
        .runner
        .output_lines(
            "get go.mod contents",
            "git",
            &["show", &format!("v{}:go.mod", current)],
        )?
        .join("\n");
    let old_mod = GoModFile::parse(&old_content)?;

    let mode = if all_commits {
        NoteMode::AllCommits
    } else {
        NoteMode::Issues
    };
    let org = ctx.config.notes.github_org.clone();
    let filter = ctx.config.notes.upstream_filter.clone();

    if !filter.is_empty() {
        for (path, version) in &new_mod.requires {
            if !path.contains(&filter) {
                continue;
            }
            let Some(project) = project_name(path) else {
                continue;
            };
            match old_mod.require_version(path) {
                None => println!("* {}: {} (new)", path, version),
                Some(prev) if prev != version => {
                    println!(
                        "* {}: [{} -> {}](https://github.com/{}/{}/compare/{}...{})",
                        path, prev, version, org, project, prev, version
                    );
                    print_changes(ctx, project, prev, version, mode)?;
                }
                Some(_) if show_unchanged => {
                    println!("* {}: {} (unchanged)", path, version);
                }
                Some(_) => {}
            }
        }
    }

    let self_project = project_name(&new_mod.module)
        .unwrap_or(&new_mod.module)
        .to_string();
    println!(
        "* {}: [{} -> {}](https://github.com/{}/{}/compare/{}...{})",
        new_mod.module, current, next, org, self_project, current, next
    );
    print_changes(ctx, &self_project, &format!("v{}", current), "HEAD", mode)?;

    Ok(())
}

/// Extract and print the changes for one project checkout. Dependency
/// projects are expected as sibling directories of the current one.
fn print_changes(
    ctx: &CommandContext,
    project: &str,
    old_rev: &str,
    new_rev: &str,
    mode: NoteMode,
) -> Result<()> {
    let dir = if new_rev == "HEAD" {
        PathBuf::from(".")
    } else {
        PathBuf::from("..").join(project)
    };
    let _cwd = WorkingDir::change_to(&dir)?;

    ctx.runner
        .run("fetch latest tags", "git", &["fetch", "--tags"])?;

    let repo = Git2Repository::open(".")?;
    let extractor = ChangeLogExtractor::new(
        &repo,
        &ctx.config.notes.release_bot,
        &ctx.config.notes.dependency_bot,
    );
    let primary = project == ctx.config.notes.primary_project;
    let entries = extractor.extract(old_rev, new_rev, mode, primary)?;

    let printed = !entries.is_empty();
    for entry in entries {
        match entry {
            ChangeEntry::Commit {
                short_id,
                summary,
                author_email,
            } => println!("    * {}: {} ({})", short_id, summary, author_email),
            ChangeEntry::Issue(number) => {
                if ctx.opts.dry_run {
                    println!("    * #{}", number);
                } else {
                    let line = lookup_issue(ctx, &number)?;
                    println!("    * {}", line);
                }
            }
        }
    }
    if printed {
        println!();
    }
    Ok(())
}

/// Fetch an issue's number, title and URL through the GitHub CLI. A
/// missing or unauthenticated `gh` is fatal for the whole run.
fn lookup_issue(ctx: &CommandContext, number: &str) -> Result<String> {
    ctx.runner.output_line(
        "look up issue via gh (github CLI; must be installed and authenticated)",
        "gh",
        &[
            "issue",
            "view",
            number,
            "--json",
            "number,title,url",
            "--jq",
            r#""[Issue #" + (.number|tostring) + "](" + .url + ") - " + .title"#,
        ],
    )
}
