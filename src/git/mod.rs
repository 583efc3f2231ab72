//! git
//!
//! Single interface for all version-control operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to git. Every repository read and
//! write the engine performs flows through a [`GitClient`] bound at
//! construction to one fixed working-copy path. No other module spawns
//! `git`, and no operation depends on the process working directory.
//!
//! # Failure policy
//!
//! Every delegated invocation's exit status is checked. A non-zero exit
//! is [`GitError::CommandFailed`], carrying the full argv and stderr, and
//! is always fatal to the run.

mod client;

pub use client::{CommitOptions, GitClient, GitError};
