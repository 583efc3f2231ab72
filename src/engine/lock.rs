//! engine::lock
//!
//! Run-scoped lock preventing concurrent synchronization runs.
//!
//! Every stage mutates shared on-disk working copies (the monorepo
//! checkout above all), so two runs against the same mirrors root must
//! never overlap. The lock is an OS-level exclusive lock on a file at
//! the mirrors root, acquired without blocking: a second run fails fast
//! rather than queueing behind a batch that may take hours.
//!
//! # Invariants
//!
//! - The lock is held for the entire pipeline run
//! - The lock is released on drop (RAII), including on panic

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Lock file name, created at the mirrors root.
const LOCK_FILE_NAME: &str = ".subsync.lock";

/// Errors from lock acquisition.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to open lock file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("another subsync run holds the lock at '{path}'")]
    Busy { path: PathBuf },
}

/// An exclusive lock over a mirrors root, released on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: File,
}

impl RunLock {
    /// Acquire the lock for `mirrors_root`, failing fast if another run
    /// holds it.
    pub fn acquire(mirrors_root: &Path) -> Result<Self, LockError> {
        let path = mirrors_root.join(LOCK_FILE_NAME);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Io {
                path: path.clone(),
                source,
            })?;

        file.try_lock_exclusive()
            .map_err(|_| LockError::Busy { path: path.clone() })?;

        Ok(Self { path, file })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Releasing a lock we hold cannot meaningfully fail; ignore.
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_reacquire_after_drop() {
        let dir = tempfile::tempdir().unwrap();

        let lock = RunLock::acquire(dir.path()).unwrap();
        assert!(lock.path().exists());
        drop(lock);

        RunLock::acquire(dir.path()).unwrap();
    }

    #[test]
    fn second_acquisition_is_busy() {
        let dir = tempfile::tempdir().unwrap();

        let _held = RunLock::acquire(dir.path()).unwrap();
        assert!(matches!(
            RunLock::acquire(dir.path()),
            Err(LockError::Busy { .. })
        ));
    }

    #[test]
    fn missing_root_is_io_error() {
        assert!(matches!(
            RunLock::acquire(Path::new("/nonexistent/mirrors")),
            Err(LockError::Io { .. })
        ));
    }
}
