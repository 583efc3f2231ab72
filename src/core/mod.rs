//! core
//!
//! Core domain types and configuration for subsync.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Commit, Tag
//! - [`component`] - The FrameworkComponent entity
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Identity and validity are checked at construction, before any
//!   repository mutation

pub mod component;
pub mod config;
pub mod types;
