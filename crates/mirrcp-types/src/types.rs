//! Core data types for mirrcp
//!
//! The data model of one synchronization pass: path keys identifying files
//! across the two trees, content digests, the actions a reconciliation plan
//! is made of, and the per-pass statistics reported back to the caller.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Error;

/// Unique identifier for synchronization passes
pub type PassId = uuid::Uuid;

/// Root-relative, separator-normalized identifier of a file.
///
/// A `PathKey` correlates entries between the source and replica trees: two
/// files with the same key are the same logical file. Keys always use `/` as
/// the separator, independent of the platform the snapshot was taken on, and
/// order lexicographically so snapshot iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathKey(String);

impl PathKey {
    /// Build a key from a path already made relative to its tree root.
    ///
    /// Non-UTF-8 path components are recorded lossily.
    pub fn from_relative(path: &Path) -> Self {
        let key = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self(key)
    }

    /// The normalized key string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert back into a native relative path
    pub fn to_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content fingerprint of a file's bytes (256-bit BLAKE3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Wrap a raw 32-byte digest
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Outcome of digesting one file.
///
/// A file whose digest could not be computed is recorded as `Unavailable`
/// rather than dropped from the snapshot, so the reconciler can treat it
/// conservatively (always "different", forcing a retry copy on a later pass).
/// Callers must match on the variant; the failure case cannot be ignored the
/// way an untyped sentinel could be.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DigestState {
    /// Digest computed successfully
    Ready(ContentDigest),
    /// The file could not be read
    Unavailable {
        /// Description of the underlying read failure
        reason: String,
    },
}

impl DigestState {
    /// Whether a digest was actually computed
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Two files are identical iff both digests are available and equal.
    /// An `Unavailable` side always compares as different.
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ready(a), Self::Ready(b)) => a == b,
            _ => false,
        }
    }
}

/// One planned synchronization action
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncAction {
    /// Copy the file at this key from source to replica, overwriting
    Copy(PathKey),
    /// Remove the file at this key from the replica
    Delete(PathKey),
}

impl SyncAction {
    /// The key this action operates on
    pub fn key(&self) -> &PathKey {
        match self {
            Self::Copy(key) | Self::Delete(key) => key,
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy(key) => write!(f, "copy {key}"),
            Self::Delete(key) => write!(f, "delete {key}"),
        }
    }
}

/// Per-action result: the action plus whether applying it succeeded
#[derive(Debug)]
pub struct ActionOutcome {
    /// The action that was applied
    pub action: SyncAction,
    /// `Ok` on success, otherwise the error that failed this action alone
    pub result: std::result::Result<(), Error>,
}

impl ActionOutcome {
    /// Record a successfully applied action
    pub fn success(action: SyncAction) -> Self {
        Self {
            action,
            result: Ok(()),
        }
    }

    /// Record a failed action
    pub fn failure(action: SyncAction, error: Error) -> Self {
        Self {
            action,
            result: Err(error),
        }
    }

    /// Whether the action was applied successfully
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate statistics for one synchronization pass
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassStats {
    /// Number of files copied to the replica
    pub files_copied: u64,
    /// Number of files removed from the replica
    pub files_removed: u64,
    /// Number of files left untouched (digests matched)
    pub files_unchanged: u64,
    /// Number of actions that failed
    pub failures: u64,
    /// Number of files found in the source tree
    pub source_files: u64,
    /// Number of files found in the replica tree
    pub replica_files: u64,
    /// Wall-clock duration of the pass
    pub duration: Duration,
}

impl PassStats {
    /// Create an empty statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of successfully applied actions
    pub fn actions_applied(&self) -> u64 {
        self.files_copied + self.files_removed
    }

    /// Merge statistics from another pass
    pub fn merge(&mut self, other: &Self) {
        self.files_copied += other.files_copied;
        self.files_removed += other.files_removed;
        self.files_unchanged += other.files_unchanged;
        self.failures += other.failures;
        self.source_files += other.source_files;
        self.replica_files += other.replica_files;
        self.duration += other.duration;
    }
}

/// Result of one complete synchronization pass
#[derive(Debug)]
pub struct PassSummary {
    /// Identifier of this pass
    pub pass_id: PassId,
    /// Aggregate counters
    pub stats: PassStats,
    /// Per-action outcomes, in plan order
    pub outcomes: Vec<ActionOutcome>,
}

impl PassSummary {
    /// Whether every planned action was applied successfully
    pub fn is_clean(&self) -> bool {
        self.stats.failures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_key_normalizes_separators() {
        let key = PathKey::from_relative(Path::new("dir").join("sub").join("a.txt").as_path());
        assert_eq!(key.as_str(), "dir/sub/a.txt");
        assert_eq!(key.to_path(), PathBuf::from("dir/sub/a.txt"));
    }

    #[test]
    fn path_key_orders_lexicographically() {
        let a = PathKey::from_relative(Path::new("a.txt"));
        let b = PathKey::from_relative(Path::new("b/a.txt"));
        assert!(a < b);
    }

    #[test]
    fn digest_display_is_lowercase_hex() {
        let digest = ContentDigest::from_bytes([0xab; 32]);
        assert_eq!(digest.to_string(), "ab".repeat(32));
    }

    #[test]
    fn unavailable_digest_never_matches() {
        let ready = DigestState::Ready(ContentDigest::from_bytes([1; 32]));
        let unavailable = DigestState::Unavailable {
            reason: "permission denied".to_string(),
        };

        assert!(ready.matches(&ready.clone()));
        assert!(!ready.matches(&unavailable));
        assert!(!unavailable.matches(&ready));
        // Two unreadable files are not "identical" either
        assert!(!unavailable.matches(&unavailable.clone()));
    }

    #[test]
    fn stats_merge_accumulates() {
        let mut stats = PassStats::new();
        stats.files_copied = 2;
        let mut other = PassStats::new();
        other.files_copied = 1;
        other.failures = 3;

        stats.merge(&other);
        assert_eq!(stats.files_copied, 3);
        assert_eq!(stats.failures, 3);
        assert_eq!(stats.actions_applied(), 3);
    }
}
