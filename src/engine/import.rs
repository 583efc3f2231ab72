//! engine::import
//!
//! Commit replay into a mirror.
//!
//! For each source commit, the importer checks out the monorepo at that
//! commit, mirrors the component subtree into the mirror working copy,
//! and commits the result. Replay is strictly sequential: both working
//! copies are shared mutable state, and every delegated invocation
//! blocks until its tool completes.
//!
//! # Commit policy
//!
//! One mirror commit is recorded per replayed monorepo commit,
//! unconditionally: commits are created with allow-empty, so a source
//! commit whose subtree effect was already present still leaves a
//! traceable entry. Authored and committed timestamps are always forced
//! to the source commit's time, never the wall-clock replay time.

use chrono::DateTime;
use thiserror::Error;

use crate::core::component::FrameworkComponent;
use crate::core::types::Commit;
use crate::git::{CommitOptions, GitClient, GitError};
use crate::mirror::{DirectorySync, MirrorError};
use crate::ui::{output, Verbosity};

/// Errors from commit replay.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

/// Replays monorepo commits into mirror working copies.
pub struct Importer<'a> {
    monorepo: &'a GitClient,
    sync: &'a dyn DirectorySync,
    /// Primary branch replayed commits land on.
    branch: &'a str,
    /// Destination tag, cited in replay commit messages.
    to_tag: &'a str,
    verbosity: Verbosity,
}

impl<'a> Importer<'a> {
    pub fn new(
        monorepo: &'a GitClient,
        sync: &'a dyn DirectorySync,
        branch: &'a str,
        to_tag: &'a str,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            monorepo,
            sync,
            branch,
            to_tag,
            verbosity,
        }
    }

    /// Replay `commits` (ascending) for `component` into its mirror.
    ///
    /// Both working copies are reset to a known-clean state first. The
    /// mirror is put on its primary branch so replayed commits land on a
    /// branch rather than a detached HEAD; a freshly initialized mirror
    /// has an unborn HEAD and its first replay commit creates the branch.
    pub fn replay(
        &self,
        component: &FrameworkComponent,
        mirror: &GitClient,
        commits: &[Commit],
    ) -> Result<(), ImportError> {
        self.monorepo.reset_hard()?;
        mirror.reset_hard()?;
        if mirror.has_head()? {
            mirror.checkout(self.branch)?;
        }

        for commit in commits {
            output::debug(
                format!(
                    "{}: replaying {} [{}]",
                    component.name(),
                    commit,
                    DateTime::from_timestamp(commit.time(), 0)
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| commit.time().to_string()),
                ),
                self.verbosity,
            );

            self.monorepo.checkout(commit.hash())?;
            self.sync
                .mirror(component.source_path(), mirror.workdir())?;
            mirror.commit(
                &self.replay_message(commit),
                &CommitOptions {
                    allow_empty: true,
                    timestamp: Some(commit.time()),
                },
            )?;
        }

        Ok(())
    }

    /// Provenance message for one replayed commit.
    fn replay_message(&self, commit: &Commit) -> String {
        format!(
            "Importing state as of {}\n\nAutomatic import via rsync\n\nPreparing release for tag '{}'",
            commit.provenance(),
            self.to_tag,
        )
    }

    /// Skip rule: a mirror already carrying the destination tag is
    /// synchronized; repeated runs are cheap and idempotent at component
    /// granularity. Fetches the remote first so tags pushed by an
    /// earlier run (or another operator) are seen.
    pub fn already_tagged(&self, mirror: &GitClient, remote: &str) -> Result<bool, ImportError> {
        mirror.fetch(remote)?;
        Ok(mirror.list_tags()?.contains(self.to_tag))
    }
}
