//! Changelog extraction: the commits (or the issues they close) between
//! two release boundaries.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};
use crate::git::{CommitDetail, Repository};

static ISSUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(fix(e[sd])?|close[sd]?|resolve[sd]?)\s*#(\d+)").expect("issue pattern")
});

/// What the extractor emits per relevant commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMode {
    /// One entry per issue-closing reference in the commit message
    Issues,
    /// One entry per commit
    AllCommits,
}

/// A single changelog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEntry {
    Commit {
        short_id: String,
        summary: String,
        author_email: String,
    },
    Issue(String),
}

/// Extracts the relevant history between an old and a new boundary
/// revision, filtering out bot and merge commits.
pub struct ChangeLogExtractor<'a, R: Repository> {
    repo: &'a R,
    release_bot: &'a str,
    dependency_bot: &'a str,
}

impl<'a, R: Repository> ChangeLogExtractor<'a, R> {
    pub fn new(repo: &'a R, release_bot: &'a str, dependency_bot: &'a str) -> Self {
        ChangeLogExtractor {
            repo,
            release_bot,
            dependency_bot,
        }
    }

    /// Produce the entries between `old_rev` (exclusive) and `new_rev`
    /// (inclusive), newest first.
    ///
    /// `primary` selects the extended old-boundary correction used for the
    /// primary project, which walks past merge bubbles to the mainline
    /// ancestor. Running out of history before reaching the old boundary
    /// is not an error.
    pub fn extract(
        &self,
        old_rev: &str,
        new_rev: &str,
        mode: NoteMode,
        primary: bool,
    ) -> Result<Vec<ChangeEntry>> {
        let new_id = self.resolve_boundary(new_rev)?;
        let old_id = self.resolve_boundary(old_rev)?;
        let old_id = self.corrected_old_boundary(&old_id, primary)?;

        let mut entries = Vec::new();
        for item in self.repo.walk(&new_id)? {
            let commit = item?;
            if commit.id == old_id {
                break;
            }
            if commit.author_name == self.release_bot
                || commit.author_name == self.dependency_bot
            {
                continue;
            }
            if commit.is_merge() {
                continue;
            }
            match mode {
                NoteMode::AllCommits => entries.push(ChangeEntry::Commit {
                    short_id: commit.short_id().to_string(),
                    summary: commit.summary().to_string(),
                    author_email: commit.author_email.clone(),
                }),
                NoteMode::Issues => {
                    for issue in extract_issues(&commit.message) {
                        entries.push(ChangeEntry::Issue(issue));
                    }
                }
            }
        }
        Ok(entries)
    }

    /// Resolve a boundary revision, falling back to the trailing hash of a
    /// `<base>-<n>-<hash>` pseudo-version when the full expression does not
    /// resolve.
    fn resolve_boundary(&self, rev: &str) -> Result<String> {
        match self.repo.resolve_revision(rev) {
            Ok(id) => Ok(id),
            Err(err) => {
                let parts: Vec<&str> = rev.split('-').collect();
                if parts.len() == 3 {
                    self.repo.resolve_revision(parts[2])
                } else {
                    Err(err)
                }
            }
        }
    }

    /// The old boundary may be a bot-authored tag commit sitting on top of
    /// the real history; step down to its parent in that case. For the
    /// primary project also walk past merge commits, following the parent
    /// with the latest author timestamp, until a non-merge commit is
    /// reached.
    fn corrected_old_boundary(&self, old_id: &str, primary: bool) -> Result<String> {
        let mut commit = self.repo.find_commit(old_id)?;

        if commit.parents.len() == 1 && commit.author_name == self.release_bot {
            commit = self.repo.find_commit(&commit.parents[0])?;
        }

        if primary {
            while commit.is_merge() {
                let mut newest: Option<CommitDetail> = None;
                for parent_id in &commit.parents {
                    let parent = self.repo.find_commit(parent_id)?;
                    let newer = match &newest {
                        Some(best) => parent.author_time > best.author_time,
                        None => true,
                    };
                    if newer {
                        newest = Some(parent);
                    }
                }
                commit = newest.ok_or_else(|| {
                    ReleaseError::traversal(format!("merge commit {} has no parents", commit.id))
                })?;
            }
        }

        Ok(commit.id)
    }
}

/// All issue numbers referenced with a closing keyword in a commit
/// message, in order of first appearance. Matching is case-insensitive
/// and accepts fix/fixes/fixed, close/closes/closed and
/// resolve/resolves/resolved.
pub fn extract_issues(message: &str) -> Vec<String> {
    ISSUE_PATTERN
        .captures_iter(&message.to_lowercase())
        .filter_map(|captures| captures.get(3).map(|m| m.as_str().to_string()))
        .collect()
}
