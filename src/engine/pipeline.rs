//! engine::pipeline
//!
//! The ordered stage pipeline over the component collection.
//!
//! # Batch semantics
//!
//! Each stage runs for **all** components before the next stage begins:
//!
//! ```text
//! Filter (fetch + skip-if-tagged)
//!   -> Import (chronological commit replay)
//!   -> Tag (annotated destination tag with provenance)
//!   -> Verify (byte-identity at the tag; fatal on any diff)
//!   -> Publish (push branch + tag)
//! ```
//!
//! The stages are an explicit ordered sequence, not a per-component
//! loop; collapsing them would reorder the batch semantics (a mirror
//! must never be published while a sibling could still fail
//! verification).
//!
//! # Failure model
//!
//! Strictly sequential, fail-stop: the first unrecoverable error ends
//! the run. There is no rollback of partially replayed mirrors; the
//! reset-to-clean import preamble and the tag-existence skip rule make
//! re-running after repair safe.

use thiserror::Error;

use crate::core::component::FrameworkComponent;
use crate::core::config::SyncConfig;
use crate::git::{GitClient, GitError};
use crate::mirror::DirectorySync;
use crate::ui::{output, Verbosity};

use super::history::{HistoryError, HistoryReader};
use super::import::{ImportError, Importer};
use super::publish::{PublishError, Publisher};
use super::tag::{TagError, Tagger};
use super::verify::{Verifier, VerifyError};

/// A stage failure, wrapped with the offending component by [`RunError`].
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failure preparing the shared monorepo working copy.
    #[error("monorepo: {0}")]
    Monorepo(#[from] GitError),

    /// Failure while processing one component.
    #[error("component '{name}' at '{path}': {source}")]
    Component {
        /// Canonical component name
        name: String,
        /// Mirror working copy path
        path: String,
        #[source]
        source: StageError,
    },
}

impl RunError {
    fn for_component(component: &FrameworkComponent, source: impl Into<StageError>) -> Self {
        RunError::Component {
            name: component.name().to_string(),
            path: component.target_path().display().to_string(),
            source: source.into(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Components replayed, tagged, and verified this run.
    pub synced: Vec<String>,
    /// Components skipped because the destination tag already existed.
    pub skipped: Vec<String>,
    /// Whether the publish stage ran.
    pub published: bool,
}

/// One component paired with the git client bound to its mirror.
struct ComponentRun {
    component: FrameworkComponent,
    mirror: GitClient,
}

/// The synchronization pipeline.
pub struct Pipeline<'a> {
    config: &'a SyncConfig,
    monorepo: &'a GitClient,
    sync: &'a dyn DirectorySync,
    verbosity: Verbosity,
    /// When set, the publish stage is skipped (dry publication).
    skip_publish: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a SyncConfig,
        monorepo: &'a GitClient,
        sync: &'a dyn DirectorySync,
        verbosity: Verbosity,
        skip_publish: bool,
    ) -> Self {
        Self {
            config,
            monorepo,
            sync,
            verbosity,
            skip_publish,
        }
    }

    /// Run all stages over `components`.
    pub fn run(&self, components: Vec<FrameworkComponent>) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        let pending = self.filter_stage(components, &mut summary)?;
        if pending.is_empty() {
            // Nothing to replay; no working copy gets touched at all.
            output::print("All components already up to date", self.verbosity);
            return Ok(summary);
        }

        self.import_stage(&pending)?;
        self.tag_stage(&pending)?;
        self.verify_stage(&pending)?;
        if self.skip_publish {
            output::print("Skipping publish stage", self.verbosity);
        } else {
            self.publish_stage(&pending)?;
            summary.published = true;
        }

        summary.synced = pending
            .iter()
            .map(|run| run.component.name().to_string())
            .collect();
        Ok(summary)
    }

    /// Stage 1: bind a git client to every mirror, fetch its remote, and
    /// drop components whose mirror already carries the destination tag.
    fn filter_stage(
        &self,
        components: Vec<FrameworkComponent>,
        summary: &mut RunSummary,
    ) -> Result<Vec<ComponentRun>, RunError> {
        let importer = self.importer();
        let mut pending = Vec::with_capacity(components.len());

        for component in components {
            output::print(format!("Checking \"{}\"", component.name()), self.verbosity);

            let mirror = GitClient::open(component.target_path())
                .map_err(|e| RunError::for_component(&component, e))?;

            let tagged = importer
                .already_tagged(&mirror, &self.config.remote)
                .map_err(|e| RunError::for_component(&component, e))?;

            if tagged {
                output::print(
                    format!(
                        "  already tagged '{}', skipping",
                        self.config.to_tag
                    ),
                    self.verbosity,
                );
                summary.skipped.push(component.name().to_string());
            } else {
                pending.push(ComponentRun { component, mirror });
            }
        }

        Ok(pending)
    }

    /// Stage 2: replay the commit range into every pending mirror.
    fn import_stage(&self, pending: &[ComponentRun]) -> Result<(), RunError> {
        let history = HistoryReader::new(self.monorepo);
        let importer = self.importer();

        for run in pending {
            let commits = history
                .commits_between(
                    run.component.source_path(),
                    &self.config.from_tag,
                    &self.config.to_tag,
                )
                .map_err(|e| RunError::for_component(&run.component, e))?;

            output::print(
                format!(
                    "Importing \"{}\": {} commit(s)",
                    run.component.name(),
                    commits.len()
                ),
                self.verbosity,
            );

            importer
                .replay(&run.component, &run.mirror, &commits)
                .map_err(|e| RunError::for_component(&run.component, e))?;
        }

        Ok(())
    }

    /// Stage 3: stamp every pending mirror with the destination tag.
    ///
    /// The monorepo is checked out at the destination tag once, up
    /// front, so every provenance message reads history from the tagged
    /// state regardless of where replay left HEAD.
    fn tag_stage(&self, pending: &[ComponentRun]) -> Result<(), RunError> {
        self.monorepo.reset_hard()?;
        self.monorepo.checkout(&self.config.to_tag)?;

        let tagger = Tagger::new(self.monorepo, &self.config.to_tag);
        for run in pending {
            let tag = tagger
                .stamp(&run.component, &run.mirror)
                .map_err(|e| RunError::for_component(&run.component, e))?;

            output::print(
                format!("Tagged \"{}\": {}", run.component.name(), tag.message()),
                self.verbosity,
            );
        }

        Ok(())
    }

    /// Stage 4: verify byte-identity at the destination tag for every
    /// pending mirror. Any diff aborts the run here; nothing is pushed.
    fn verify_stage(&self, pending: &[ComponentRun]) -> Result<(), RunError> {
        let verifier = Verifier::new(self.sync, &self.config.to_tag);

        for run in pending {
            verifier
                .verify(&run.component, &run.mirror)
                .map_err(|e| RunError::for_component(&run.component, e))?;

            output::print(
                format!("Verified \"{}\"", run.component.name()),
                self.verbosity,
            );
        }

        Ok(())
    }

    /// Stage 5: push branch and tag for every pending mirror.
    fn publish_stage(&self, pending: &[ComponentRun]) -> Result<(), RunError> {
        let publisher = Publisher::new(
            &self.config.remote,
            &self.config.branch,
            &self.config.to_tag,
        );

        for run in pending {
            publisher
                .publish(&run.mirror)
                .map_err(|e| RunError::for_component(&run.component, e))?;

            output::print(
                format!(
                    "Published \"{}\" to '{}'",
                    run.component.name(),
                    self.config.remote
                ),
                self.verbosity,
            );
        }

        Ok(())
    }

    fn importer(&self) -> Importer<'_> {
        Importer::new(
            self.monorepo,
            self.sync,
            &self.config.branch,
            &self.config.to_tag,
            self.verbosity,
        )
    }
}
