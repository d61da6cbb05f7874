//! Applying planned synchronization actions
//!
//! Each action is applied independently: a failure is converted into a
//! failed [`ActionOutcome`] carrying the key and cause, and never halts the
//! rest of the batch.

use mirrcp_types::{ActionOutcome, Error, EventSink, PathKey, SyncAction};
use std::fs;
use std::path::{Path, PathBuf};

/// Absolute source and replica roots that a [`PathKey`] resolves against
#[derive(Debug, Clone)]
pub struct RootPair {
    source: PathBuf,
    replica: PathBuf,
}

impl RootPair {
    /// Create a root pair
    pub fn new<P: Into<PathBuf>>(source: P, replica: P) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
        }
    }

    /// The source tree root
    pub fn source_root(&self) -> &Path {
        &self.source
    }

    /// The replica tree root
    pub fn replica_root(&self) -> &Path {
        &self.replica
    }

    /// Absolute path of `key` under the source root
    pub fn source_path(&self, key: &PathKey) -> PathBuf {
        self.source.join(key.to_path())
    }

    /// Absolute path of `key` under the replica root
    pub fn replica_path(&self, key: &PathKey) -> PathBuf {
        self.replica.join(key.to_path())
    }
}

/// Applies single planned actions against a [`RootPair`]
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    preserve_permissions: bool,
}

impl ActionExecutor {
    /// Create an executor
    pub fn new(preserve_permissions: bool) -> Self {
        Self {
            preserve_permissions,
        }
    }

    /// Apply one action and report how it went.
    ///
    /// Copy creates any missing parent directories under the replica root,
    /// copies the file bytes (overwriting an existing replica file), and
    /// propagates the source modification time and, optionally, permission
    /// bits. Delete removes the single replica file at the key.
    pub fn apply(
        &self,
        roots: &RootPair,
        action: &SyncAction,
        events: &dyn EventSink,
    ) -> ActionOutcome {
        let result = match action {
            SyncAction::Copy(key) => self.copy(roots, key, events),
            SyncAction::Delete(key) => self.delete(roots, key, events),
        };

        match result {
            Ok(()) => ActionOutcome::success(action.clone()),
            Err(error) => {
                events.error(&error.to_string());
                ActionOutcome::failure(action.clone(), error)
            }
        }
    }

    fn copy(&self, roots: &RootPair, key: &PathKey, events: &dyn EventSink) -> Result<(), Error> {
        let source = roots.source_path(key);
        let replica = roots.replica_path(key);
        let fail = |error: std::io::Error| Error::Copy {
            key: key.clone(),
            message: error.to_string(),
        };

        if let Some(parent) = replica.parent() {
            fs::create_dir_all(parent).map_err(fail)?;
        }
        fs::copy(&source, &replica).map_err(fail)?;
        self.propagate_metadata(&source, &replica);

        events.info(&format!(
            "Copied: {} to {}",
            source.display(),
            replica.display()
        ));
        Ok(())
    }

    fn delete(&self, roots: &RootPair, key: &PathKey, events: &dyn EventSink) -> Result<(), Error> {
        let replica = roots.replica_path(key);

        fs::remove_file(&replica).map_err(|error| Error::Delete {
            key: key.clone(),
            message: error.to_string(),
        })?;

        events.info(&format!("Removed: {}", replica.display()));
        Ok(())
    }

    // Metadata propagation never fails the action; the bytes are already
    // copied and the digests match on the next pass regardless.
    fn propagate_metadata(&self, source: &Path, replica: &Path) {
        let Ok(metadata) = fs::metadata(source) else {
            return;
        };

        if let Ok(modified) = metadata.modified() {
            let _ = filetime::set_file_mtime(replica, filetime::FileTime::from_system_time(modified));
        }
        if self.preserve_permissions {
            let _ = fs::set_permissions(replica, metadata.permissions());
        }
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrcp_types::NullSink;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemorySink {
        infos: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
    }

    impl EventSink for MemorySink {
        fn info(&self, message: &str) {
            self.infos.lock().unwrap().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn key(s: &str) -> PathKey {
        PathKey::from_relative(Path::new(s))
    }

    fn roots() -> (TempDir, TempDir, RootPair) {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        let pair = RootPair::new(source.path(), replica.path());
        (source, replica, pair)
    }

    #[test]
    fn copy_creates_missing_parent_directories() {
        let (source, replica, pair) = roots();
        fs::create_dir_all(source.path().join("a/b")).unwrap();
        fs::write(source.path().join("a/b/deep.txt"), b"payload").unwrap();

        let outcome = ActionExecutor::default().apply(
            &pair,
            &SyncAction::Copy(key("a/b/deep.txt")),
            &NullSink,
        );

        assert!(outcome.is_success());
        assert_eq!(
            fs::read(replica.path().join("a/b/deep.txt")).unwrap(),
            b"payload"
        );
    }

    #[test]
    fn copy_overwrites_existing_replica_file() {
        let (source, replica, pair) = roots();
        fs::write(source.path().join("a.txt"), b"new").unwrap();
        fs::write(replica.path().join("a.txt"), b"old").unwrap();

        let outcome =
            ActionExecutor::default().apply(&pair, &SyncAction::Copy(key("a.txt")), &NullSink);

        assert!(outcome.is_success());
        assert_eq!(fs::read(replica.path().join("a.txt")).unwrap(), b"new");
    }

    #[test]
    fn copy_propagates_modification_time() {
        let (source, replica, pair) = roots();
        let source_file = source.path().join("a.txt");
        fs::write(&source_file, b"content").unwrap();
        let stamp = filetime::FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&source_file, stamp).unwrap();

        ActionExecutor::default().apply(&pair, &SyncAction::Copy(key("a.txt")), &NullSink);

        let replica_meta = fs::metadata(replica.path().join("a.txt")).unwrap();
        assert_eq!(
            filetime::FileTime::from_last_modification_time(&replica_meta),
            stamp
        );
    }

    #[test]
    fn delete_removes_single_file() {
        let (_source, replica, pair) = roots();
        fs::write(replica.path().join("old.txt"), b"x").unwrap();

        let sink = MemorySink::default();
        let outcome =
            ActionExecutor::default().apply(&pair, &SyncAction::Delete(key("old.txt")), &sink);

        assert!(outcome.is_success());
        assert!(!replica.path().join("old.txt").exists());
        assert!(sink.infos.lock().unwrap()[0].starts_with("Removed: "));
    }

    #[test]
    fn failed_copy_is_reported_not_propagated() {
        let (_source, _replica, pair) = roots();

        let sink = MemorySink::default();
        let outcome = ActionExecutor::default().apply(
            &pair,
            &SyncAction::Copy(key("vanished.txt")),
            &sink,
        );

        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.result,
            Err(Error::Copy { .. })
        ));
        assert_eq!(sink.errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn failed_delete_is_reported_not_propagated() {
        let (_source, _replica, pair) = roots();

        let sink = MemorySink::default();
        let outcome = ActionExecutor::default().apply(
            &pair,
            &SyncAction::Delete(key("already-gone.txt")),
            &sink,
        );

        assert!(!outcome.is_success());
        assert!(matches!(outcome.result, Err(Error::Delete { .. })));
    }

    #[test]
    fn copy_reports_source_and_replica_paths() {
        let (source, _replica, pair) = roots();
        fs::write(source.path().join("a.txt"), b"x").unwrap();

        let sink = MemorySink::default();
        ActionExecutor::default().apply(&pair, &SyncAction::Copy(key("a.txt")), &sink);

        let infos = sink.infos.lock().unwrap();
        assert!(infos[0].starts_with("Copied: "));
        assert!(infos[0].contains("a.txt"));
    }
}
