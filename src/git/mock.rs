use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::{ReleaseError, Result};
use crate::git::{CommitDetail, Repository};

/// Mock repository for testing without actual git operations.
///
/// Holds an in-memory commit graph and replays git's newest-first,
/// time-ordered traversal over it.
pub struct MockRepository {
    commits: HashMap<String, CommitDetail>,
    tags: HashMap<String, String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    /// Add a commit to the graph
    pub fn add_commit(&mut self, commit: CommitDetail) {
        self.commits.insert(commit.id.clone(), commit);
    }

    /// Add a tag pointing at a commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.tags.insert(name.into(), id.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.tags.keys().cloned().collect();
        tags.sort();
        Ok(tags)
    }

    fn resolve_revision(&self, spec: &str) -> Result<String> {
        if let Some(id) = self.tags.get(spec) {
            return Ok(id.clone());
        }
        if self.commits.contains_key(spec) {
            return Ok(spec.to_string());
        }
        Err(ReleaseError::Revision {
            spec: spec.to_string(),
            detail: "revspec not found".to_string(),
        })
    }

    fn find_commit(&self, id: &str) -> Result<CommitDetail> {
        self.commits
            .get(id)
            .cloned()
            .ok_or_else(|| ReleaseError::traversal(format!("no commit {}", id)))
    }

    fn walk<'a>(
        &'a self,
        from: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<CommitDetail>> + 'a>> {
        let start = self.find_commit(from)?;
        let mut pending = BinaryHeap::new();
        let mut seen = HashSet::new();
        seen.insert(start.id.clone());
        pending.push((start.author_time, start.id.clone()));

        Ok(Box::new(MockWalk {
            repo: self,
            pending,
            seen,
        }))
    }
}

/// Newest-first walk over the mock graph, ordered by commit time.
struct MockWalk<'a> {
    repo: &'a MockRepository,
    pending: BinaryHeap<(i64, String)>,
    seen: HashSet<String>,
}

impl<'a> Iterator for MockWalk<'a> {
    type Item = Result<CommitDetail>;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, id) = self.pending.pop()?;
        let commit = match self.repo.find_commit(&id) {
            Ok(commit) => commit,
            // A parent referenced by the graph but never added: surfaces as
            // a traversal error, like a corrupt repository would.
            Err(err) => return Some(Err(err)),
        };
        for parent in &commit.parents {
            if self.seen.insert(parent.clone()) {
                let time = self
                    .repo
                    .commits
                    .get(parent)
                    .map(|c| c.author_time)
                    .unwrap_or(i64::MIN);
                self.pending.push((time, parent.clone()));
            }
        }
        Some(Ok(commit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str, time: i64, parents: &[&str]) -> CommitDetail {
        CommitDetail {
            id: id.to_string(),
            message: format!("commit {}", id),
            author_name: "dev".to_string(),
            author_email: "dev@example.com".to_string(),
            author_time: time,
            parents: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_walk_is_newest_first() {
        let mut repo = MockRepository::new();
        repo.add_commit(commit("a", 1, &[]));
        repo.add_commit(commit("b", 2, &["a"]));
        repo.add_commit(commit("c", 3, &["b"]));

        let ids: Vec<String> = repo
            .walk("c")
            .unwrap()
            .map(|c| c.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_walk_merges_both_sides() {
        let mut repo = MockRepository::new();
        repo.add_commit(commit("root", 1, &[]));
        repo.add_commit(commit("left", 3, &["root"]));
        repo.add_commit(commit("right", 2, &["root"]));
        repo.add_commit(commit("merge", 4, &["left", "right"]));

        let ids: Vec<String> = repo
            .walk("merge")
            .unwrap()
            .map(|c| c.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["merge", "left", "right", "root"]);
    }

    #[test]
    fn test_list_tags_sorted() {
        let mut repo = MockRepository::new();
        repo.add_commit(commit("a", 1, &[]));
        repo.add_tag("v1.1.0", "a");
        repo.add_tag("v1.0.0", "a");

        assert_eq!(
            repo.list_tags().unwrap(),
            vec!["v1.0.0".to_string(), "v1.1.0".to_string()]
        );
    }

    #[test]
    fn test_resolve_revision_by_tag() {
        let mut repo = MockRepository::new();
        repo.add_commit(commit("a", 1, &[]));
        repo.add_tag("v1.0.0", "a");

        assert_eq!(repo.resolve_revision("v1.0.0").unwrap(), "a");
        assert_eq!(repo.resolve_revision("a").unwrap(), "a");
        assert!(repo.resolve_revision("v9.9.9").is_err());
    }

    #[test]
    fn test_walk_missing_parent_is_error() {
        let mut repo = MockRepository::new();
        repo.add_commit(commit("b", 2, &["ghost"]));

        let results: Vec<Result<CommitDetail>> = repo.walk("b").unwrap().collect();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
