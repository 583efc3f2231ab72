//! engine::history
//!
//! Commit-history queries against the monorepo.
//!
//! The underlying `git log` returns commits newest-first; replay needs
//! them oldest-first, so [`HistoryReader::commits_between`] reverses the
//! sequence. Each raw record is decoded (and validated) into a
//! [`Commit`] before anything downstream sees it; a malformed record
//! fails the whole query.

use std::path::Path;

use thiserror::Error;

use crate::core::types::Commit;
use crate::git::{GitClient, GitError};

/// Errors from history queries.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Git(#[from] GitError),

    /// No commit in the repository touches the subtree.
    #[error("no commits touch '{path}'")]
    NoCommits { path: String },
}

/// Reads subtree-scoped commit history from a repository.
pub struct HistoryReader<'a> {
    git: &'a GitClient,
}

impl<'a> HistoryReader<'a> {
    pub fn new(git: &'a GitClient) -> Self {
        Self { git }
    }

    /// Commits touching `subtree` in `(from_ref, to_ref]`, ascending
    /// chronological order.
    pub fn commits_between(
        &self,
        subtree: &Path,
        from_ref: &str,
        to_ref: &str,
    ) -> Result<Vec<Commit>, HistoryError> {
        let range = format!("{}..{}", from_ref, to_ref);
        let mut commits = self.git.log(&range, subtree)?;
        commits.reverse();
        Ok(commits)
    }

    /// Most recent commit touching `subtree` from the current HEAD; the
    /// source of provenance messages.
    pub fn last_commit(&self, subtree: &Path) -> Result<Commit, HistoryError> {
        self.git
            .log_last(subtree)?
            .ok_or_else(|| HistoryError::NoCommits {
                path: subtree.display().to_string(),
            })
    }
}
