//! engine
//!
//! The synchronization engine: replay, tagging, verification,
//! publication.
//!
//! # Architecture
//!
//! The engine is an explicit ordered pipeline over the discovered
//! component collection (see [`pipeline`]). Each stage completes for
//! every component before the next stage starts, and everything runs
//! strictly sequentially because the monorepo working copy is shared
//! mutable state across all components.
//!
//! # Modules
//!
//! - [`history`] - Subtree-scoped commit history queries
//! - [`import`] - Chronological commit replay into mirrors
//! - [`tag`] - Annotated destination tags with provenance
//! - [`verify`] - Byte-identity verification at the destination tag
//! - [`publish`] - Push of verified branch and tag
//! - [`pipeline`] - Stage ordering and failure wrapping
//! - [`lock`] - Cross-process run lock over the mirrors root

pub mod history;
pub mod import;
pub mod lock;
pub mod pipeline;
pub mod publish;
pub mod tag;
pub mod verify;

pub use lock::{LockError, RunLock};
pub use pipeline::{Pipeline, RunError, RunSummary};
pub use verify::ConsistencyError;
