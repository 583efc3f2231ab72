//! engine::tag
//!
//! Destination-tag stamping.
//!
//! After replay, each mirror is stamped with an annotated tag named
//! after the destination tag. The annotation records provenance: the
//! canonical component name plus the hash and time of the most recent
//! monorepo commit touching the component's subtree, in the form
//! `<name>@<hash> (<time>)`.

use thiserror::Error;

use crate::core::component::FrameworkComponent;
use crate::core::types::Tag;
use crate::git::{GitClient, GitError};

use super::history::{HistoryError, HistoryReader};

/// Errors from tag stamping.
#[derive(Debug, Error)]
pub enum TagError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Stamps mirrors with the destination tag.
pub struct Tagger<'a> {
    monorepo: &'a GitClient,
    to_tag: &'a str,
}

impl<'a> Tagger<'a> {
    pub fn new(monorepo: &'a GitClient, to_tag: &'a str) -> Self {
        Self { monorepo, to_tag }
    }

    /// Stamp `component`'s mirror, overwriting a same-named tag if one
    /// exists. The monorepo must already be checked out at the
    /// destination tag so the last-touching commit is read at the tagged
    /// state.
    pub fn stamp(
        &self,
        component: &FrameworkComponent,
        mirror: &GitClient,
    ) -> Result<Tag, TagError> {
        let history = HistoryReader::new(self.monorepo);
        let last = history.last_commit(component.source_path())?;

        let tag = Tag::with_provenance(self.to_tag, component.name(), last);
        mirror.tag(tag.name(), tag.message(), true)?;

        Ok(tag)
    }
}
