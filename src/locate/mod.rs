//! locate
//!
//! Component discovery.
//!
//! The locator walks the mirrors root recursively; a directory qualifies
//! as a mirror working copy when it contains a `.git` control
//! subdirectory. The walk does not descend past a working copy, so a
//! repository nested inside a mirror (a vendored checkout, say) is never
//! misread as a component.
//!
//! # Namespace extraction
//!
//! A qualifying path is mapped to a namespace by stripping the mirrors
//! root, then popping trailing path segments and prepending each to the
//! namespace until the boundary segment (the monorepo's top-level library
//! folder name, `Zend` by default) is reached or segments run out. The
//! collected segments are joined with `\`:
//!
//! ```text
//! <root>/zendframework/Zend/Http     ->  Http
//! <root>/zendframework/Http/Client   ->  Http\Client
//! ```
//!
//! The matching monorepo subtree is
//! `<monorepo>/<library prefix>/<namespace with '\' converted to '/'>`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::component::{ComponentError, FrameworkComponent};
use crate::core::config::SyncConfig;
use crate::manifest::ManifestReader;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: &str = "\\";

/// Errors from component discovery.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Discovers mirror working copies under the mirrors root and derives a
/// [`FrameworkComponent`] for each.
pub struct ComponentLocator<'a> {
    config: &'a SyncConfig,
    manifests: &'a dyn ManifestReader,
}

impl<'a> ComponentLocator<'a> {
    pub fn new(config: &'a SyncConfig, manifests: &'a dyn ManifestReader) -> Self {
        Self { config, manifests }
    }

    /// Discover all components, sorted by canonical name for a
    /// deterministic run order.
    ///
    /// # Errors
    ///
    /// - [`LocateError::Walk`] when the mirrors root cannot be read
    /// - [`LocateError::Component`] when a mirror's identity fails
    ///   validation (construction happens here, before any mutation)
    pub fn locate(&self) -> Result<Vec<FrameworkComponent>, LocateError> {
        let mut working_copies = Vec::new();
        walk(&self.config.mirrors, &mut working_copies)?;

        let mut components = Vec::with_capacity(working_copies.len());
        for target_path in working_copies {
            let namespace =
                extract_namespace(&target_path, &self.config.mirrors, &self.config.boundary);
            let source_path = self.source_path(&namespace);
            components.push(FrameworkComponent::new(
                namespace,
                source_path,
                target_path,
                self.manifests,
            )?);
        }

        components.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(components)
    }

    /// Monorepo subtree path for a namespace.
    fn source_path(&self, namespace: &str) -> PathBuf {
        self.config
            .monorepo
            .join(&self.config.library_prefix)
            .join(namespace.replace(NAMESPACE_SEPARATOR, "/"))
    }
}

/// Recursively collect working-copy roots under `dir`, without
/// descending into them.
fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), LocateError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LocateError::Walk {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut subdirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    for subdir in subdirs {
        if subdir.join(".git").is_dir() {
            found.push(subdir);
        } else {
            walk(&subdir, found)?;
        }
    }

    Ok(())
}

/// Derive a component namespace from a working-copy path.
///
/// Pops trailing segments of the root-relative path, prepending each to
/// the namespace, until the boundary segment is met or segments are
/// exhausted.
pub fn extract_namespace(path: &Path, base: &Path, boundary: &str) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);

    let mut segments: Vec<&str> = relative
        .iter()
        .filter_map(|segment| segment.to_str())
        .collect();

    let mut name = Vec::new();
    while let Some(segment) = segments.pop() {
        if segment == boundary {
            break;
        }
        name.insert(0, segment);
    }

    name.join(NAMESPACE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod namespace {
        use super::*;

        #[test]
        fn stops_at_boundary_segment() {
            let namespace = extract_namespace(
                Path::new("/src/mirrors/zendframework/Zend/Http"),
                Path::new("/src/mirrors/zendframework"),
                "Zend",
            );
            assert_eq!(namespace, "Http");
        }

        #[test]
        fn joins_nested_segments() {
            let namespace = extract_namespace(
                Path::new("/src/mirrors/zendframework/Zend/Http/Client"),
                Path::new("/src/mirrors/zendframework"),
                "Zend",
            );
            assert_eq!(namespace, "Http\\Client");
        }

        #[test]
        fn exhausts_segments_without_boundary() {
            let namespace = extract_namespace(
                Path::new("/src/mirrors/zendframework/Http"),
                Path::new("/src/mirrors/zendframework"),
                "Zend",
            );
            assert_eq!(namespace, "Http");
        }

        #[test]
        fn boundary_below_tail_is_ignored_segments_above_kept() {
            // Only segments after the boundary contribute.
            let namespace = extract_namespace(
                Path::new("/src/mirrors/vendor/Zend/Form/Element"),
                Path::new("/src/mirrors/vendor"),
                "Zend",
            );
            assert_eq!(namespace, "Form\\Element");
        }
    }

    mod walking {
        use super::*;
        use std::fs;

        fn mkrepo(root: &Path, relative: &str) {
            let dir = root.join(relative);
            fs::create_dir_all(dir.join(".git")).unwrap();
        }

        #[test]
        fn finds_working_copies_recursively() {
            let root = tempfile::tempdir().unwrap();
            mkrepo(root.path(), "Zend/Http");
            mkrepo(root.path(), "Zend/Uri");
            fs::create_dir_all(root.path().join("Zend/NotARepo")).unwrap();

            let mut found = Vec::new();
            walk(root.path(), &mut found).unwrap();

            assert_eq!(
                found,
                vec![root.path().join("Zend/Http"), root.path().join("Zend/Uri")]
            );
        }

        #[test]
        fn does_not_descend_into_working_copies() {
            let root = tempfile::tempdir().unwrap();
            mkrepo(root.path(), "Zend/Http");
            mkrepo(root.path(), "Zend/Http/vendor/nested");

            let mut found = Vec::new();
            walk(root.path(), &mut found).unwrap();

            assert_eq!(found, vec![root.path().join("Zend/Http")]);
        }

        #[test]
        fn missing_root_errors() {
            let mut found = Vec::new();
            assert!(matches!(
                walk(Path::new("/nonexistent/mirrors"), &mut found),
                Err(LocateError::Walk { .. })
            ));
        }
    }
}
