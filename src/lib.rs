//! subsync - keep per-component mirror repositories synchronized with a
//! monorepo
//!
//! subsync replays monorepo history commit-by-commit into per-component
//! mirror repositories and stamps matching release tags, so each
//! mirror's tagged state is byte-identical to the monorepo subtree at
//! the same tag.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, composes collaborators)
//! - [`engine`] - Ordered stage pipeline: filter → import → tag → verify → publish
//! - [`core`] - Domain types, component entity, and configuration
//! - [`git`] - Single interface for all version-control operations
//! - [`mirror`] - Delegated directory-mirroring operation
//! - [`manifest`] - Package-manifest reading
//! - [`locate`] - Component discovery and namespace mapping
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! 1. Construction-time validation (commit hashes, component identity)
//!    fails before any repository is mutated
//! 2. Every delegated tool invocation has its exit status checked
//! 3. A mirror is published only after byte-identity verification at the
//!    destination tag succeeds for every component in the run
//! 4. Exactly one mirror commit is recorded per replayed monorepo
//!    commit, with the original timestamp

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod locate;
pub mod manifest;
pub mod mirror;
pub mod ui;
