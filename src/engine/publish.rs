//! engine::publish
//!
//! Publication of verified mirrors.
//!
//! Pushes each mirror's primary branch and the destination tag to the
//! configured remote. The pipeline runs this stage only after every
//! component passed verification; an unverified state is never pushed.

use thiserror::Error;

use crate::git::{GitClient, GitError};

/// Errors from publication.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Pushes verified mirror state to a remote.
pub struct Publisher<'a> {
    remote: &'a str,
    branch: &'a str,
    to_tag: &'a str,
}

impl<'a> Publisher<'a> {
    pub fn new(remote: &'a str, branch: &'a str, to_tag: &'a str) -> Self {
        Self {
            remote,
            branch,
            to_tag,
        }
    }

    /// Push a mirror's primary branch and destination tag.
    ///
    /// Pushes are forced: the tagger may have overwritten an existing
    /// same-named tag, and the remote must converge on the verified
    /// state.
    pub fn publish(&self, mirror: &GitClient) -> Result<(), PublishError> {
        mirror.push(self.remote, self.branch, true)?;
        mirror.push(self.remote, self.to_tag, true)?;
        Ok(())
    }
}
