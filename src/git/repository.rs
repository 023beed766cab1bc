use std::path::Path;

use git2::{Oid, Repository as Git2Repo, Sort};

use crate::error::{ReleaseError, Result};
use crate::git::{CommitDetail, Repository};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Repository { repo })
    }

    fn commit_detail(&self, oid: Oid) -> Result<CommitDetail> {
        let commit = self.repo.find_commit(oid)?;
        let author = commit.author();
        Ok(CommitDetail {
            id: oid.to_string(),
            message: commit.message().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            author_time: author.when().seconds(),
            parents: commit.parent_ids().map(|p| p.to_string()).collect(),
        })
    }
}

impl Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn resolve_revision(&self, spec: &str) -> Result<String> {
        let object = self.repo.revparse_single(spec).map_err(|e| {
            ReleaseError::Revision {
                spec: spec.to_string(),
                detail: e.message().to_string(),
            }
        })?;
        // Annotated tags peel to the commit they point at
        let commit = object.peel_to_commit().map_err(|e| ReleaseError::Revision {
            spec: spec.to_string(),
            detail: e.message().to_string(),
        })?;
        Ok(commit.id().to_string())
    }

    fn find_commit(&self, id: &str) -> Result<CommitDetail> {
        let oid = Oid::from_str(id).map_err(|e| ReleaseError::Revision {
            spec: id.to_string(),
            detail: e.message().to_string(),
        })?;
        self.commit_detail(oid)
    }

    fn walk<'a>(
        &'a self,
        from: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<CommitDetail>> + 'a>> {
        let oid = Oid::from_str(from).map_err(|e| ReleaseError::Revision {
            spec: from.to_string(),
            detail: e.message().to_string(),
        })?;
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(oid)?;

        Ok(Box::new(revwalk.map(move |item| match item {
            Ok(oid) => self.commit_detail(oid),
            Err(e) => Err(ReleaseError::Git(e)),
        })))
    }
}
