//! Directory tree snapshots
//!
//! A snapshot maps every regular file under a root to its content digest,
//! keyed by root-relative, separator-normalized path. Directories are not
//! recorded separately; they are implied by the file keys and recreated on
//! demand when actions are applied.

use crate::digest::DigestProvider;
use mirrcp_types::{DigestState, EventSink, PathKey};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Immutable mapping from [`PathKey`] to [`DigestState`] for one tree root,
/// captured at one instant. Iteration is in sorted key order.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    entries: BTreeMap<PathKey, DigestState>,
}

impl TreeSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the digest recorded for `key`
    pub fn get(&self, key: &PathKey) -> Option<&DigestState> {
        self.entries.get(key)
    }

    /// Whether `key` was present in the tree
    pub fn contains(&self, key: &PathKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of files recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot records no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&PathKey, &DigestState)> {
        self.entries.iter()
    }

    /// Iterate over keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &PathKey> {
        self.entries.keys()
    }

    fn insert(&mut self, key: PathKey, digest: DigestState) {
        self.entries.insert(key, digest);
    }
}

impl FromIterator<(PathKey, DigestState)> for TreeSnapshot {
    fn from_iter<I: IntoIterator<Item = (PathKey, DigestState)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Walks a directory tree and produces a [`TreeSnapshot`].
///
/// Traversal never aborts on a per-entry error: an inaccessible directory or
/// a file that vanishes mid-walk is reported through the sink and skipped,
/// and the walk continues. Symbolic links and other non-regular entries are
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct Snapshotter {
    digester: DigestProvider,
}

impl Snapshotter {
    /// Create a snapshotter using the given digest provider
    pub fn new(digester: DigestProvider) -> Self {
        Self { digester }
    }

    /// Snapshot every regular file reachable from `root`.
    ///
    /// Returns the completed mapping once traversal finishes; there are no
    /// partial results.
    pub fn snapshot(&self, root: &Path, events: &dyn EventSink) -> TreeSnapshot {
        let mut snapshot = TreeSnapshot::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    events.error(&format!(
                        "Failed to read an entry under '{}': {}",
                        root.display(),
                        error
                    ));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };

            let digest = self.digester.digest(entry.path(), events);
            snapshot.insert(PathKey::from_relative(relative), digest);
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrcp_types::NullSink;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemorySink {
        errors: Mutex<Vec<String>>,
    }

    impl EventSink for MemorySink {
        fn info(&self, _message: &str) {}

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn key(s: &str) -> PathKey {
        PathKey::from_relative(Path::new(s))
    }

    #[test]
    fn records_nested_files_with_normalized_keys() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.txt"), b"1").unwrap();
        fs::write(dir.path().join("a/mid.txt"), b"2").unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), b"3").unwrap();

        let snapshot = Snapshotter::default().snapshot(dir.path(), &NullSink);

        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.contains(&key("top.txt")));
        assert!(snapshot.contains(&key("a/mid.txt")));
        assert!(snapshot.contains(&key("a/b/deep.txt")));
    }

    #[test]
    fn directories_are_not_recorded() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();

        let snapshot = Snapshotter::default().snapshot(dir.path(), &NullSink);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn missing_root_reports_and_yields_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let sink = MemorySink::default();

        let snapshot = Snapshotter::default().snapshot(&dir.path().join("absent"), &sink);

        assert!(snapshot.is_empty());
        assert_eq!(sink.errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn iteration_is_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c/z.txt"), b"z").unwrap();

        let snapshot = Snapshotter::default().snapshot(dir.path(), &NullSink);
        let keys: Vec<_> = snapshot.keys().map(PathKey::as_str).collect();
        assert_eq!(keys, vec!["a.txt", "b.txt", "c/z.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("real.txt"), b"real").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let snapshot = Snapshotter::default().snapshot(dir.path(), &NullSink);

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains(&key("real.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn inaccessible_subdirectory_does_not_abort_the_walk() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"x").unwrap();
        fs::write(dir.path().join("visible.txt"), b"y").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let sink = MemorySink::default();
        let snapshot = Snapshotter::default().snapshot(dir.path(), &sink);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(snapshot.contains(&key("visible.txt")));
        assert!(!snapshot.contains(&key("locked/hidden.txt")));
        assert!(!sink.errors.lock().unwrap().is_empty());
    }
}
