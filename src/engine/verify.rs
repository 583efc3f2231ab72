//! engine::verify
//!
//! Post-tag verification.
//!
//! The verifier is the authority that a published mirror state is
//! correct: with both the monorepo and the mirror checked out at the
//! destination tag, the monorepo subtree and the mirror tree must be
//! byte-identical, version-control metadata excluded. Zero tolerance -
//! any non-empty diff aborts the entire run with the full diff surfaced,
//! and nothing downstream may proceed.
//!
//! # Mechanism
//!
//! Rather than hand-rolling a tree walk, verification reuses the same
//! delegated mirroring operation the importer used: mirror the subtree
//! onto the tag checkout and ask git whether anything in the working
//! copy changed. An identical tree mirrors to a no-op; any added,
//! removed, or modified file shows up in `status --porcelain` and
//! `diff`. The mirror working copy is reset afterward either way.

use thiserror::Error;

use crate::core::component::FrameworkComponent;
use crate::git::{GitClient, GitError};
use crate::mirror::{DirectorySync, MirrorError};

/// A verified mirror state diverged from the monorepo subtree at the
/// destination tag. Fatal; carries the full diff.
#[derive(Debug, Error)]
#[error(
    "mirror '{component}' at '{path}' diverges from the monorepo subtree at tag '{tag}':\n{diff}"
)]
pub struct ConsistencyError {
    /// Canonical component name
    pub component: String,
    /// Mirror working copy path
    pub path: String,
    /// Destination tag under verification
    pub tag: String,
    /// Full diff content (porcelain status followed by patch text)
    pub diff: String,
}

/// Errors from verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

/// Verifies mirrors against the monorepo at the destination tag.
pub struct Verifier<'a> {
    sync: &'a dyn DirectorySync,
    to_tag: &'a str,
}

impl<'a> Verifier<'a> {
    pub fn new(sync: &'a dyn DirectorySync, to_tag: &'a str) -> Self {
        Self { sync, to_tag }
    }

    /// Verify one component. The monorepo must already be checked out at
    /// the destination tag; the mirror is checked out here.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Consistency`] when the trees differ; the error
    /// carries the complete diff.
    pub fn verify(
        &self,
        component: &FrameworkComponent,
        mirror: &GitClient,
    ) -> Result<(), VerifyError> {
        mirror.reset_hard()?;
        mirror.checkout(self.to_tag)?;

        self.sync
            .mirror(component.source_path(), mirror.workdir())?;

        let status = mirror.status_porcelain()?;
        let patch = mirror.diff()?;
        let clean = status.trim().is_empty() && patch.trim().is_empty();

        // Leave the working copy as we found it before judging.
        mirror.reset_hard()?;

        if clean {
            Ok(())
        } else {
            Err(ConsistencyError {
                component: component.name().to_string(),
                path: mirror.workdir().display().to_string(),
                tag: self.to_tag.to_string(),
                diff: format!("{}{}", status, patch),
            }
            .into())
        }
    }
}
