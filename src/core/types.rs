//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Commit`] - A monorepo revision: validated 40-hex hash plus commit time
//! - [`Tag`] - An annotated tag stamped on a mirror, with provenance
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented: a [`Commit`] with a wrong-length hash or a
//! non-integer timestamp is a construction-time [`TypeError`], never a
//! later failure.
//!
//! # Examples
//!
//! ```
//! use subsync::core::types::Commit;
//!
//! let commit = Commit::new("a".repeat(40), 100).unwrap();
//! assert_eq!(commit.time(), 100);
//!
//! // Invalid constructions fail at creation time
//! assert!(Commit::new("abc123", 100).is_err());
//! ```

use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit hash: {0}")]
    InvalidHash(String),

    #[error("invalid commit timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("malformed log record: {0}")]
    MalformedRecord(String),
}

/// A single monorepo revision: commit hash plus commit time.
///
/// Commits are constructed transiently while iterating history and
/// discarded after use. The hash is the identity; two commits with the
/// same hash are the same revision.
///
/// # Example
///
/// ```
/// use subsync::core::types::Commit;
///
/// let commit = Commit::new("abc123def4567890abc123def4567890abc12345", 1234).unwrap();
/// assert_eq!(commit.hash(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(commit.time(), 1234);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    hash: String,
    time: i64,
}

impl Commit {
    /// Length of a full SHA-1 object id in hex form.
    const HASH_LEN: usize = 40;

    /// Create a new validated commit.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidHash`] unless `hash` is exactly 40
    /// hexadecimal characters.
    pub fn new(hash: impl Into<String>, time: i64) -> Result<Self, TypeError> {
        let hash = hash.into();

        if hash.len() != Self::HASH_LEN || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHash(hash));
        }

        Ok(Self { hash, time })
    }

    /// Decode a raw `<committer-time>:<hash>` log record.
    ///
    /// This is the only place `git log --format=%ct:%H` output is
    /// interpreted. Malformed records (missing separator, non-integer
    /// timestamp, wrong hash length) fail here; no partial record is
    /// ever accepted.
    ///
    /// # Example
    ///
    /// ```
    /// use subsync::core::types::Commit;
    ///
    /// let record = format!("200:{}", "b".repeat(40));
    /// let commit = Commit::parse_record(&record).unwrap();
    /// assert_eq!(commit.time(), 200);
    /// ```
    pub fn parse_record(record: &str) -> Result<Self, TypeError> {
        let (time, hash) = record
            .split_once(':')
            .ok_or_else(|| TypeError::MalformedRecord(record.to_string()))?;

        let time: i64 = time
            .parse()
            .map_err(|_| TypeError::InvalidTimestamp(time.to_string()))?;

        Self::new(hash, time)
    }

    /// The full 40-character hex hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Commit time, seconds since the Unix epoch.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Provenance form used in commit and tag messages: `<hash> (<time>)`.
    pub fn provenance(&self) -> String {
        format!("{} ({})", self.hash, self.time)
    }
}

impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.provenance())
    }
}

/// An annotated tag stamped on a mirror repository.
///
/// Created by the tagger, never mutated. The message records the
/// originating monorepo commit (`<name>@<hash> (<time>)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    message: String,
    commit: Commit,
}

impl Tag {
    /// Build a tag with a provenance message for `component_name`.
    pub fn with_provenance(name: impl Into<String>, component_name: &str, commit: Commit) -> Self {
        let message = format!("{}@{}", component_name, commit.provenance());
        Self {
            name: name.into(),
            message,
            commit,
        }
    }

    /// The tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The annotation message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The monorepo commit this tag records.
    pub fn commit(&self) -> &Commit {
        &self.commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod commit {
        use super::*;

        #[test]
        fn valid_commit() {
            let hash = "a".repeat(40);
            let commit = Commit::new(hash.clone(), 100).unwrap();
            assert_eq!(commit.hash(), hash);
            assert_eq!(commit.time(), 100);
        }

        #[test]
        fn short_hash_rejected() {
            assert_eq!(
                Commit::new("abc", 100),
                Err(TypeError::InvalidHash("abc".to_string()))
            );
        }

        #[test]
        fn long_hash_rejected() {
            assert!(Commit::new("a".repeat(41), 100).is_err());
        }

        #[test]
        fn non_hex_hash_rejected() {
            assert!(Commit::new("z".repeat(40), 100).is_err());
        }

        #[test]
        fn negative_time_accepted() {
            // Commits predating the epoch are unusual but representable.
            assert!(Commit::new("0".repeat(40), -1).is_ok());
        }

        #[test]
        fn provenance_format() {
            let commit = Commit::new("b".repeat(40), 200).unwrap();
            assert_eq!(commit.provenance(), format!("{} (200)", "b".repeat(40)));
            assert_eq!(commit.to_string(), commit.provenance());
        }

        proptest! {
            #[test]
            fn any_40_hex_hash_roundtrips(hash in "[0-9a-f]{40}", time in any::<i64>()) {
                let commit = Commit::new(hash.clone(), time).unwrap();
                prop_assert_eq!(commit.hash(), hash.as_str());
                prop_assert_eq!(commit.time(), time);
            }

            #[test]
            fn wrong_length_always_rejected(hash in "[0-9a-f]{0,39}", time in any::<i64>()) {
                prop_assert!(Commit::new(hash, time).is_err());
            }
        }
    }

    mod parse_record {
        use super::*;

        #[test]
        fn valid_record() {
            let record = format!("200:{}", "b".repeat(40));
            let commit = Commit::parse_record(&record).unwrap();
            assert_eq!(commit.time(), 200);
            assert_eq!(commit.hash(), "b".repeat(40));
        }

        #[test]
        fn missing_separator_rejected() {
            assert!(matches!(
                Commit::parse_record("deadbeef"),
                Err(TypeError::MalformedRecord(_))
            ));
        }

        #[test]
        fn non_integer_time_rejected() {
            let record = format!("soon:{}", "b".repeat(40));
            assert!(matches!(
                Commit::parse_record(&record),
                Err(TypeError::InvalidTimestamp(_))
            ));
        }

        #[test]
        fn wrong_hash_length_rejected() {
            assert!(matches!(
                Commit::parse_record("100:abc"),
                Err(TypeError::InvalidHash(_))
            ));
        }

        #[test]
        fn hash_containing_colon_splits_on_first() {
            // %H never contains ':', so everything after the first colon
            // must validate as a hash.
            let record = format!("100:100:{}", "b".repeat(38));
            assert!(Commit::parse_record(&record).is_err());
        }
    }

    mod tag {
        use super::*;

        #[test]
        fn provenance_message() {
            let commit = Commit::new("b".repeat(40), 200).unwrap();
            let tag = Tag::with_provenance("v1", "vendor/foo", commit.clone());
            assert_eq!(tag.name(), "v1");
            assert_eq!(tag.message(), format!("vendor/foo@{} (200)", "b".repeat(40)));
            assert_eq!(tag.commit(), &commit);
        }
    }
}
