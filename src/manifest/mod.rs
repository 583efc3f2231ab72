//! manifest
//!
//! Package-manifest reading.
//!
//! Components declare their canonical package identifier in a
//! `composer.json` manifest at the subtree root. This module is the only
//! place manifests are parsed; everything else asks a [`ManifestReader`]
//! for the canonical name and compares strings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("manifest '{path}' declares no package name")]
    MissingName { path: PathBuf },
}

/// Reads the canonical package name declared by a directory's manifest.
pub trait ManifestReader {
    /// Canonical name declared by the manifest in `dir`.
    fn canonical_name(&self, dir: &Path) -> Result<String, ManifestError>;
}

/// The fields of `composer.json` we care about.
#[derive(Debug, Deserialize)]
struct ComposerFields {
    name: Option<String>,
}

/// `composer.json`-backed [`ManifestReader`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ComposerManifest;

impl ComposerManifest {
    /// Manifest file name within a component directory.
    pub const FILE_NAME: &'static str = "composer.json";
}

impl ManifestReader for ComposerManifest {
    fn canonical_name(&self, dir: &Path) -> Result<String, ManifestError> {
        let path = dir.join(Self::FILE_NAME);

        let contents = fs::read_to_string(&path).map_err(|source| ManifestError::ReadError {
            path: path.clone(),
            source,
        })?;

        let fields: ComposerFields =
            serde_json::from_str(&contents).map_err(|e| ManifestError::ParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        fields.name.ok_or(ManifestError::MissingName { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, contents: &str) {
        fs::write(dir.join(ComposerManifest::FILE_NAME), contents).unwrap();
    }

    #[test]
    fn reads_name() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{"name": "zendframework/zend-http", "require": {"php": ">=5.3.23"}}"#,
        );

        let name = ComposerManifest.canonical_name(dir.path()).unwrap();
        assert_eq!(name, "zendframework/zend-http");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ComposerManifest.canonical_name(dir.path()),
            Err(ManifestError::ReadError { .. })
        ));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), "{not json");
        assert!(matches!(
            ComposerManifest.canonical_name(dir.path()),
            Err(ManifestError::ParseError { .. })
        ));
    }

    #[test]
    fn nameless_manifest_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), r#"{"description": "no name here"}"#);
        assert!(matches!(
            ComposerManifest.canonical_name(dir.path()),
            Err(ManifestError::MissingName { .. })
        ));
    }
}
