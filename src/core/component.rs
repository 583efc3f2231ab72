//! core::component
//!
//! The framework-component entity.
//!
//! A [`FrameworkComponent`] pairs a component's namespace and canonical
//! package name with its two on-disk locations: the monorepo subtree it
//! is sourced from and the mirror working copy it is replayed into.
//! Identity is validated at construction, before any repository is
//! mutated: the manifests at both locations must declare exactly the
//! same canonical name.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::{ManifestError, ManifestReader};

/// Errors from component construction.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The manifest-declared name disagrees between the monorepo subtree
    /// and the mirror.
    #[error(
        "component '{namespace}': manifest at '{source_path}' declares '{source_name}' \
         but mirror at '{target_path}' declares '{target_name}'"
    )]
    IdentityMismatch {
        namespace: String,
        source_path: PathBuf,
        source_name: String,
        target_path: PathBuf,
        target_name: String,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// A component under synchronization: namespace, canonical name, monorepo
/// subtree, mirror working copy.
///
/// Built once per run from the directory scan plus manifest reads;
/// read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkComponent {
    namespace: String,
    name: String,
    source_path: PathBuf,
    target_path: PathBuf,
}

impl FrameworkComponent {
    /// Construct a component, validating its identity.
    ///
    /// Reads the manifest at both paths; the mirror's declared name is
    /// the canonical one and the monorepo subtree must agree with it.
    ///
    /// # Errors
    ///
    /// [`ComponentError::IdentityMismatch`] when the names disagree;
    /// [`ComponentError::Manifest`] when either manifest is unreadable.
    pub fn new(
        namespace: impl Into<String>,
        source_path: impl Into<PathBuf>,
        target_path: impl Into<PathBuf>,
        manifests: &dyn ManifestReader,
    ) -> Result<Self, ComponentError> {
        let namespace = namespace.into();
        let source_path = source_path.into();
        let target_path = target_path.into();

        let source_name = manifests.canonical_name(&source_path)?;
        let target_name = manifests.canonical_name(&target_path)?;

        if source_name != target_name {
            return Err(ComponentError::IdentityMismatch {
                namespace,
                source_path,
                source_name,
                target_path,
                target_name,
            });
        }

        Ok(Self {
            namespace,
            name: target_name,
            source_path,
            target_path,
        })
    }

    /// Namespace derived from the mirror's path segments (for display).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Canonical package identifier, as declared by both manifests.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Monorepo subtree this component is sourced from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Mirror repository root this component is replayed into.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl std::fmt::Display for FrameworkComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Manifest reader backed by a fixed path → name map.
    struct FakeManifests(HashMap<PathBuf, String>);

    impl ManifestReader for FakeManifests {
        fn canonical_name(&self, dir: &Path) -> Result<String, ManifestError> {
            self.0
                .get(dir)
                .cloned()
                .ok_or_else(|| ManifestError::MissingName {
                    path: dir.to_path_buf(),
                })
        }
    }

    fn manifests(source: &str, target: &str) -> FakeManifests {
        let mut map = HashMap::new();
        map.insert(PathBuf::from("/zf2/library/Zend/Http"), source.to_string());
        map.insert(PathBuf::from("/mirrors/Zend/Http"), target.to_string());
        FakeManifests(map)
    }

    #[test]
    fn matching_names_construct() {
        let component = FrameworkComponent::new(
            "Http",
            "/zf2/library/Zend/Http",
            "/mirrors/Zend/Http",
            &manifests("zendframework/zend-http", "zendframework/zend-http"),
        )
        .unwrap();

        assert_eq!(component.name(), "zendframework/zend-http");
        assert_eq!(component.namespace(), "Http");
        assert_eq!(component.source_path(), Path::new("/zf2/library/Zend/Http"));
        assert_eq!(component.target_path(), Path::new("/mirrors/Zend/Http"));
    }

    #[test]
    fn mismatched_names_rejected() {
        let err = FrameworkComponent::new(
            "Http",
            "/zf2/library/Zend/Http",
            "/mirrors/Zend/Http",
            &manifests("zendframework/zend-http", "zendframework/zend-uri"),
        )
        .unwrap_err();

        match err {
            ComponentError::IdentityMismatch {
                source_name,
                target_name,
                ..
            } => {
                assert_eq!(source_name, "zendframework/zend-http");
                assert_eq!(target_name, "zendframework/zend-uri");
            }
            other => panic!("expected IdentityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_manifest_propagates() {
        let err = FrameworkComponent::new(
            "Http",
            "/zf2/library/Zend/Missing",
            "/mirrors/Zend/Http",
            &manifests("zendframework/zend-http", "zendframework/zend-http"),
        )
        .unwrap_err();

        assert!(matches!(err, ComponentError::Manifest(_)));
    }
}
