//! cli
//!
//! Command-line interface layer for subsync.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration (file + flag precedence)
//! - Compose the collaborators and delegate to the engine
//!
//! The CLI layer is thin: it builds the immutable [`SyncConfig`], takes
//! the run lock, and hands the component collection to the engine
//! pipeline. All repository mutation happens inside the engine.

pub mod args;

pub use args::{Cli, Command};

use anyhow::Result;

use crate::core::config::{FileConfig, SyncConfig};
use crate::engine::{Pipeline, RunLock};
use crate::git::GitClient;
use crate::locate::ComponentLocator;
use crate::manifest::ComposerManifest;
use crate::mirror::RsyncMirror;
use crate::ui::{output, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let file = FileConfig::load(&cli.config)?;

    match cli.command {
        Command::Run {
            config,
            skip_publish,
        } => {
            let config = SyncConfig::resolve(file, config.into())?;
            run_sync(&config, verbosity, skip_publish)
        }
        Command::Components { config } => {
            let config = SyncConfig::resolve(file, config.into())?;
            list_components(&config)
        }
    }
}

/// Execute the full synchronization pipeline.
fn run_sync(config: &SyncConfig, verbosity: Verbosity, skip_publish: bool) -> Result<()> {
    let _lock = RunLock::acquire(&config.mirrors)?;

    let manifests = ComposerManifest;
    let locator = ComponentLocator::new(config, &manifests);
    let components = locator.locate()?;

    output::print(
        format!(
            "Discovered {} component(s) under '{}'",
            components.len(),
            config.mirrors.display()
        ),
        verbosity,
    );

    let monorepo = GitClient::open(&config.monorepo)?;
    let sync = RsyncMirror;
    let pipeline = Pipeline::new(config, &monorepo, &sync, verbosity, skip_publish);
    let summary = pipeline.run(components)?;

    output::print(
        format!(
            "Done: {} synchronized, {} already up to date",
            summary.synced.len(),
            summary.skipped.len()
        ),
        verbosity,
    );
    Ok(())
}

/// Print the discovered components; read-only debugging aid.
fn list_components(config: &SyncConfig) -> Result<()> {
    let manifests = ComposerManifest;
    let locator = ComponentLocator::new(config, &manifests);

    for component in locator.locate()? {
        println!(
            "{}\t{} -> {}",
            component,
            component.source_path().display(),
            component.target_path().display()
        );
    }

    Ok(())
}
