//! git::client
//!
//! Git client implementation, shelling out to the `git` binary.
//!
//! A [`GitClient`] is bound to one repository path at construction and
//! passes `-C <path>` on every invocation, so no operation ever depends
//! on (or mutates) the process working directory. Log output is decoded
//! through [`Commit::parse_record`], the single colon-delimited-record
//! decoder.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::core::types::{Commit, TypeError};

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The bound path is not a git working copy.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was checked
        path: PathBuf,
    },

    /// The `git` binary could not be spawned at all.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// A delegated git invocation exited non-zero.
    ///
    /// Exit statuses are checked on every call and always fatal; no
    /// invocation is fire-and-forget.
    #[error("'{command}' failed with {status}: {stderr}")]
    CommandFailed {
        /// The rendered command line
        command: String,
        /// The exit status
        status: String,
        /// Captured stderr
        stderr: String,
    },

    /// Command output was not valid UTF-8.
    #[error("'{command}' produced non-UTF-8 output")]
    InvalidOutput { command: String },

    /// A log record failed Commit construction.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Options for creating a commit.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Record the commit even when the change set is empty.
    pub allow_empty: bool,
    /// Force authored and committed timestamps to this epoch time
    /// instead of wall-clock time.
    pub timestamp: Option<i64>,
}

/// A git client bound to one repository working copy.
///
/// # Example
///
/// ```no_run
/// use subsync::git::GitClient;
/// use std::path::Path;
///
/// let git = GitClient::open(Path::new("/src/zf2"))?;
/// git.checkout("release-2.2.5")?;
/// # Ok::<(), subsync::git::GitError>(())
/// ```
#[derive(Debug)]
pub struct GitClient {
    workdir: PathBuf,
}

impl GitClient {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Bind a client to the working copy at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotARepo`] unless `path` contains a `.git`
    /// control directory.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        if !path.join(".git").exists() {
            return Err(GitError::NotARepo {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            workdir: path.to_path_buf(),
        })
    }

    /// The working copy this client is bound to.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    // =========================================================================
    // Invocation plumbing
    // =========================================================================

    /// Run git with the given arguments and checked exit status,
    /// returning stdout.
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        self.run_with_env(args, &[])
    }

    fn run_with_env(&self, args: &[&str], env: &[(&str, String)]) -> Result<String, GitError> {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.workdir).args(args);
        for (key, value) in env {
            command.env(key, value);
        }

        let rendered = format!("{:?}", command);
        let output = command.output().map_err(|source| GitError::Spawn {
            command: rendered.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GitError::InvalidOutput { command: rendered })
    }

    /// Run git, treating a non-zero exit as `false` rather than an error.
    ///
    /// Only for predicates (`rev-parse --verify`); mutations always go
    /// through [`Self::run`].
    fn probe(&self, args: &[&str]) -> Result<bool, GitError> {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.workdir).args(args);

        let rendered = format!("{:?}", command);
        let output = command.output().map_err(|source| GitError::Spawn {
            command: rendered,
            source,
        })?;

        Ok(output.status.success())
    }

    // =========================================================================
    // Working copy state
    // =========================================================================

    /// Check out a ref (branch, tag, or commit hash).
    pub fn checkout(&self, reference: &str) -> Result<(), GitError> {
        self.run(&["checkout", "--quiet", reference])?;
        Ok(())
    }

    /// Discard all uncommitted changes, staged or not.
    ///
    /// Stages everything first so newly added files are swept away by the
    /// hard reset as well. A repository with an unborn HEAD (no commits
    /// yet) has nothing to reset to and is left untouched.
    pub fn reset_hard(&self) -> Result<(), GitError> {
        if !self.has_head()? {
            return Ok(());
        }

        self.run(&["add", "-A", ":/"])?;
        self.run(&["reset", "--quiet", "--hard", "HEAD"])?;
        Ok(())
    }

    /// Whether HEAD points at a commit (false in a freshly initialized
    /// repository).
    pub fn has_head(&self) -> Result<bool, GitError> {
        self.probe(&["rev-parse", "--verify", "--quiet", "HEAD"])
    }

    // =========================================================================
    // Commits and tags
    // =========================================================================

    /// Stage all changes and commit them.
    pub fn commit(&self, message: &str, options: &CommitOptions) -> Result<(), GitError> {
        self.run(&["add", "-A", ":/"])?;

        let mut args = vec!["commit", "--quiet", "-m", message];
        if options.allow_empty {
            args.push("--allow-empty");
        }

        // Git's explicit raw date form. The "@" prefix is required: a
        // bare number is only treated as an epoch when it happens to
        // look like a plausible date, so small values get rejected.
        let mut env = Vec::new();
        if let Some(timestamp) = options.timestamp {
            let date = format!("@{} +0000", timestamp);
            env.push(("GIT_AUTHOR_DATE", date.clone()));
            env.push(("GIT_COMMITTER_DATE", date));
        }

        self.run_with_env(&args, &env)?;
        Ok(())
    }

    /// Create an annotated tag, optionally replacing an existing one of
    /// the same name.
    pub fn tag(&self, name: &str, message: &str, force: bool) -> Result<(), GitError> {
        let mut args = vec!["tag", "-a"];
        if force {
            args.push("-f");
        }
        args.extend(["-m", message, name]);

        self.run(&args)?;
        Ok(())
    }

    /// All tag names in this repository.
    pub fn list_tags(&self) -> Result<BTreeSet<String>, GitError> {
        let stdout = self.run(&["tag", "--list"])?;
        Ok(stdout.lines().map(str::to_string).collect())
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// Fetch a remote (branches and tags).
    pub fn fetch(&self, remote: &str) -> Result<(), GitError> {
        self.run(&["fetch", "--quiet", "--tags", remote])?;
        Ok(())
    }

    /// Push a single ref to a remote.
    pub fn push(&self, remote: &str, reference: &str, force: bool) -> Result<(), GitError> {
        let mut args = vec!["push", "--quiet"];
        if force {
            args.push("--force");
        }
        args.extend([remote, reference]);

        self.run(&args)?;
        Ok(())
    }

    // =========================================================================
    // History and diffs
    // =========================================================================

    /// Commits in `range` touching `path`, newest first, decoded through
    /// the single `<time>:<hash>` record decoder.
    pub fn log(&self, range: &str, path: &Path) -> Result<Vec<Commit>, GitError> {
        let path = path.to_string_lossy();
        let stdout = self.run(&[
            "log",
            "--format=format:%ct:%H",
            range,
            "--",
            path.as_ref(),
        ])?;

        stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| Commit::parse_record(line).map_err(GitError::from))
            .collect()
    }

    /// Most recent commit touching `path` from the current HEAD, or
    /// `None` if no commit touches it.
    pub fn log_last(&self, path: &Path) -> Result<Option<Commit>, GitError> {
        let path = path.to_string_lossy();
        let stdout = self.run(&["log", "-1", "--format=format:%ct:%H", "--", path.as_ref()])?;

        let record = stdout.trim();
        if record.is_empty() {
            return Ok(None);
        }

        Ok(Some(Commit::parse_record(record)?))
    }

    /// Unstaged changes against the index, as patch text.
    pub fn diff(&self) -> Result<String, GitError> {
        self.run(&["diff"])
    }

    /// Working copy status in porcelain form; empty when clean.
    pub fn status_porcelain(&self) -> Result<String, GitError> {
        self.run(&["status", "--porcelain"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GitClient::open(dir.path()),
            Err(GitError::NotARepo { .. })
        ));
    }

    #[test]
    fn open_accepts_repository() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let git = GitClient::open(dir.path()).unwrap();
        assert_eq!(git.workdir(), dir.path());
    }

    #[test]
    fn commit_options_default_to_strict() {
        let options = CommitOptions::default();
        assert!(!options.allow_empty);
        assert!(options.timestamp.is_none());
    }
}
