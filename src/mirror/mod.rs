//! mirror
//!
//! Directory-mirroring collaborator.
//!
//! Making a mirror working copy's tree match a monorepo subtree is
//! delegated to `rsync`: archive mode with `--delete`, version-control
//! metadata protected from deletion and editor swap/undo files excluded.
//! The engine only sees [`DirectorySync::mirror`] and a checked exit
//! status.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from directory mirroring.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("'{command}' failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Makes `dest`'s tree match `source`'s tree exactly, deletions included,
/// except version-control metadata and editor temp files.
pub trait DirectorySync {
    fn mirror(&self, source: &Path, dest: &Path) -> Result<(), MirrorError>;
}

/// `rsync`-backed [`DirectorySync`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RsyncMirror;

impl RsyncMirror {
    /// Fixed rsync arguments: archive + delete, `.git*` protected from
    /// deletion, vim swap and undo files excluded.
    const ARGS: [&'static str; 6] = [
        "--quiet",
        "--archive",
        "--delete",
        "--filter=P .git*",
        "--exclude=.*.sw*",
        "--exclude=.*.un~",
    ];

    /// rsync distinguishes "the directory" from "the directory's
    /// contents" by a trailing slash; we always mean contents.
    fn with_trailing_slash(path: &Path) -> PathBuf {
        let mut s = path.as_os_str().to_os_string();
        s.push("/");
        PathBuf::from(s)
    }
}

impl DirectorySync for RsyncMirror {
    fn mirror(&self, source: &Path, dest: &Path) -> Result<(), MirrorError> {
        let mut command = Command::new("rsync");
        command
            .args(Self::ARGS)
            .arg(Self::with_trailing_slash(source))
            .arg(Self::with_trailing_slash(dest));

        let rendered = format!("{:?}", command);
        let output = command.output().map_err(|source| MirrorError::Spawn {
            command: rendered.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(MirrorError::CommandFailed {
                command: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn trailing_slash_appended() {
        let path = RsyncMirror::with_trailing_slash(Path::new("/tmp/source"));
        assert_eq!(path, PathBuf::from("/tmp/source/"));
    }

    #[test]
    fn mirrors_adds_updates_and_deletions() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        fs::write(source.path().join("kept.txt"), "one").unwrap();
        fs::write(source.path().join("changed.txt"), "new contents").unwrap();
        fs::write(dest.path().join("changed.txt"), "old contents").unwrap();
        fs::write(dest.path().join("extraneous.txt"), "delete me").unwrap();

        RsyncMirror.mirror(source.path(), dest.path()).unwrap();

        assert_eq!(fs::read_to_string(dest.path().join("kept.txt")).unwrap(), "one");
        assert_eq!(
            fs::read_to_string(dest.path().join("changed.txt")).unwrap(),
            "new contents"
        );
        assert!(!dest.path().join("extraneous.txt").exists());
    }

    #[test]
    fn git_metadata_survives_mirroring() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        fs::write(source.path().join("file.txt"), "payload").unwrap();
        fs::create_dir(dest.path().join(".git")).unwrap();
        fs::write(dest.path().join(".git/HEAD"), "ref: refs/heads/master").unwrap();

        RsyncMirror.mirror(source.path(), dest.path()).unwrap();

        assert!(dest.path().join(".git/HEAD").exists());
        assert!(dest.path().join("file.txt").exists());
    }

    #[test]
    fn editor_swap_files_not_copied() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        fs::write(source.path().join("file.txt"), "payload").unwrap();
        fs::write(source.path().join(".file.txt.swp"), "vim state").unwrap();

        RsyncMirror.mirror(source.path(), dest.path()).unwrap();

        assert!(dest.path().join("file.txt").exists());
        assert!(!dest.path().join(".file.txt.swp").exists());
    }

    #[test]
    fn missing_source_is_command_failure() {
        let dest = tempfile::tempdir().unwrap();
        assert!(matches!(
            RsyncMirror.mirror(Path::new("/nonexistent/source"), dest.path()),
            Err(MirrorError::CommandFailed { .. })
        ));
    }
}
