//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides
//! earlier):
//! 1. Built-in defaults (remote, branch, namespace boundary, library prefix)
//! 2. TOML config file (`subsync.toml` in the working directory, or the
//!    path given with `--config`)
//! 3. CLI flags
//!
//! The resolved [`SyncConfig`] is loaded once and immutable for the run.
//!
//! # Example
//!
//! ```no_run
//! use subsync::core::config::{FileConfig, Overrides, SyncConfig};
//! use std::path::Path;
//!
//! let file = FileConfig::load(Path::new("subsync.toml")).unwrap();
//! let config = SyncConfig::resolve(file, Overrides::default()).unwrap();
//! println!("syncing {} -> {}", config.from_tag, config.to_tag);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default remote mirrors are fetched from and published to.
const DEFAULT_REMOTE: &str = "origin";

/// Default primary branch replayed commits land on.
const DEFAULT_BRANCH: &str = "master";

/// Default namespace boundary segment (the monorepo's top-level library
/// folder name; namespace extraction stops here).
const DEFAULT_BOUNDARY: &str = "Zend";

/// Default monorepo library prefix under which component subtrees live.
const DEFAULT_LIBRARY_PREFIX: &str = "library/Zend";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("missing required setting '{0}' (set it in subsync.toml or pass the flag)")]
    Missing(&'static str),
}

/// Raw on-disk configuration. Every field is optional; requirements are
/// enforced after CLI overrides are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Path to the monorepo working copy.
    pub monorepo: Option<PathBuf>,
    /// Root directory under which mirror working copies live.
    pub mirrors: Option<PathBuf>,
    /// Ref the replayed commit range starts from (exclusive).
    pub from_tag: Option<String>,
    /// Destination tag stamped on every mirror (inclusive range end).
    pub to_tag: Option<String>,
    /// Remote name for fetch and push.
    pub remote: Option<String>,
    /// Primary branch of the mirrors.
    pub branch: Option<String>,
    /// Namespace boundary segment.
    pub boundary: Option<String>,
    /// Monorepo library prefix.
    pub library_prefix: Option<String>,
}

impl FileConfig {
    /// Load a config file. A missing file is not an error (defaults and
    /// CLI flags may cover everything); a file that exists but cannot be
    /// read or parsed is.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// CLI-provided overrides, applied on top of [`FileConfig`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub monorepo: Option<PathBuf>,
    pub mirrors: Option<PathBuf>,
    pub from_tag: Option<String>,
    pub to_tag: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
}

/// Resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Path to the monorepo working copy.
    pub monorepo: PathBuf,
    /// Root directory under which mirror working copies live.
    pub mirrors: PathBuf,
    /// Ref the replayed commit range starts from (exclusive).
    pub from_tag: String,
    /// Destination tag stamped on every mirror.
    pub to_tag: String,
    /// Remote name for fetch and push.
    pub remote: String,
    /// Primary branch of the mirrors.
    pub branch: String,
    /// Namespace boundary segment.
    pub boundary: String,
    /// Monorepo library prefix.
    pub library_prefix: String,
}

impl SyncConfig {
    /// Merge file config and CLI overrides into a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a required setting (monorepo,
    /// mirrors, from_tag, to_tag) is provided by neither source.
    pub fn resolve(file: FileConfig, over: Overrides) -> Result<Self, ConfigError> {
        Ok(Self {
            monorepo: over
                .monorepo
                .or(file.monorepo)
                .ok_or(ConfigError::Missing("monorepo"))?,
            mirrors: over
                .mirrors
                .or(file.mirrors)
                .ok_or(ConfigError::Missing("mirrors"))?,
            from_tag: over
                .from_tag
                .or(file.from_tag)
                .ok_or(ConfigError::Missing("from_tag"))?,
            to_tag: over
                .to_tag
                .or(file.to_tag)
                .ok_or(ConfigError::Missing("to_tag"))?,
            remote: over
                .remote
                .or(file.remote)
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            branch: over
                .branch
                .or(file.branch)
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            boundary: file.boundary.unwrap_or_else(|| DEFAULT_BOUNDARY.to_string()),
            library_prefix: file
                .library_prefix
                .unwrap_or_else(|| DEFAULT_LIBRARY_PREFIX.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_file() -> FileConfig {
        FileConfig {
            monorepo: Some(PathBuf::from("/src/zf2")),
            mirrors: Some(PathBuf::from("/src/mirrors/zendframework")),
            from_tag: Some("release-2.2.4".to_string()),
            to_tag: Some("release-2.2.5".to_string()),
            remote: None,
            branch: None,
            boundary: None,
            library_prefix: None,
        }
    }

    #[test]
    fn defaults_applied() {
        let config = SyncConfig::resolve(full_file(), Overrides::default()).unwrap();
        assert_eq!(config.remote, "origin");
        assert_eq!(config.branch, "master");
        assert_eq!(config.boundary, "Zend");
        assert_eq!(config.library_prefix, "library/Zend");
    }

    #[test]
    fn overrides_take_precedence() {
        let over = Overrides {
            to_tag: Some("release-2.3.0".to_string()),
            remote: Some("upstream".to_string()),
            ..Default::default()
        };
        let config = SyncConfig::resolve(full_file(), over).unwrap();
        assert_eq!(config.to_tag, "release-2.3.0");
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.from_tag, "release-2.2.4");
    }

    #[test]
    fn missing_required_setting_rejected() {
        let mut file = full_file();
        file.to_tag = None;
        let err = SyncConfig::resolve(file, Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("to_tag")));
    }

    #[test]
    fn parse_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subsync.toml");
        std::fs::write(
            &path,
            r#"
monorepo = "/src/zf2"
mirrors = "/src/mirrors/zendframework"
from_tag = "release-2.2.4"
to_tag = "release-2.2.5"
branch = "main"
"#,
        )
        .unwrap();

        let file = FileConfig::load(&path).unwrap();
        let config = SyncConfig::resolve(file, Overrides::default()).unwrap();
        assert_eq!(config.branch, "main");
        assert_eq!(config.monorepo, PathBuf::from("/src/zf2"));
    }

    #[test]
    fn missing_file_is_defaults() {
        let file = FileConfig::load(Path::new("/nonexistent/subsync.toml")).unwrap();
        assert!(file.monorepo.is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subsync.toml");
        std::fs::write(&path, "monorepoo = \"/typo\"\n").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
