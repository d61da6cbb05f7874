//! Mirror pass orchestration

use crate::digest::DigestProvider;
use crate::executor::{ActionExecutor, RootPair};
use crate::reconcile;
use crate::snapshot::Snapshotter;
use mirrcp_config::Config;
use mirrcp_types::{Error, EventSink, PassStats, PassSummary, Result, SyncAction};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Drives one complete synchronization pass: validate roots, snapshot both
/// trees, reconcile, and apply the plan.
///
/// The engine holds no cross-pass state. Every pass snapshots both trees from
/// scratch, which is what makes a partially failed pass self-correct on the
/// next one: reconciliation is always computed against current on-disk state.
#[derive(Debug)]
pub struct MirrorEngine {
    roots: RootPair,
    snapshotter: Snapshotter,
    executor: ActionExecutor,
}

impl MirrorEngine {
    /// Create an engine with default tuning for the given roots
    pub fn new<P: Into<PathBuf>>(source: P, replica: P) -> Self {
        Self {
            roots: RootPair::new(source.into(), replica.into()),
            snapshotter: Snapshotter::default(),
            executor: ActionExecutor::default(),
        }
    }

    /// Create an engine from a validated configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            roots: RootPair::new(
                config.mirror.source_root.clone(),
                config.mirror.replica_root.clone(),
            ),
            snapshotter: Snapshotter::new(DigestProvider::new(config.sync.digest_chunk_size)),
            executor: ActionExecutor::new(config.sync.preserve_permissions),
        }
    }

    /// The roots this engine mirrors between
    pub fn roots(&self) -> &RootPair {
        &self.roots
    }

    /// Run one synchronization pass.
    ///
    /// Fatal-to-pass conditions (missing source root, replica root that
    /// cannot be created) abort with an error and no mutation. Per-action
    /// failures are recorded in the summary and never abort the pass; a
    /// partially completed pass leaves the replica in whatever state the
    /// completed actions produced, to be corrected next pass.
    pub fn run_pass(&self, events: &dyn EventSink) -> Result<PassSummary> {
        let started = Instant::now();
        let source = self.roots.source_root();
        let replica = self.roots.replica_root();

        events.info(&format!(
            "Starting synchronization from {} to {}",
            source.display(),
            replica.display()
        ));

        if !source.exists() {
            let error = Error::SourceMissing {
                path: source.to_path_buf(),
            };
            events.error(&error.to_string());
            return Err(error);
        }
        if !source.is_dir() {
            let error = Error::SourceNotDirectory {
                path: source.to_path_buf(),
            };
            events.error(&error.to_string());
            return Err(error);
        }

        if replica.exists() && !replica.is_dir() {
            let error = Error::ReplicaCreate {
                path: replica.to_path_buf(),
                message: "path exists and is not a directory".to_string(),
            };
            events.error(&error.to_string());
            return Err(error);
        }
        if !replica.exists() {
            events.info(&format!(
                "Replica folder {} does not exist, creating it",
                replica.display()
            ));
            if let Err(io_error) = fs::create_dir_all(replica) {
                let error = Error::ReplicaCreate {
                    path: replica.to_path_buf(),
                    message: io_error.to_string(),
                };
                events.error(&error.to_string());
                return Err(error);
            }
        }

        let source_snapshot = self.snapshotter.snapshot(source, events);
        let replica_snapshot = self.snapshotter.snapshot(replica, events);
        let actions = reconcile::plan(&source_snapshot, &replica_snapshot);

        let mut stats = PassStats::new();
        stats.source_files = source_snapshot.len() as u64;
        stats.replica_files = replica_snapshot.len() as u64;
        let planned_copies = actions
            .iter()
            .filter(|action| matches!(action, SyncAction::Copy(_)))
            .count() as u64;
        stats.files_unchanged = stats.source_files - planned_copies;

        events.info(&format!(
            "Planned {} actions ({} files in source, {} in replica)",
            actions.len(),
            stats.source_files,
            stats.replica_files
        ));

        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            let outcome = self.executor.apply(&self.roots, &action, events);
            match (&outcome.action, outcome.is_success()) {
                (SyncAction::Copy(_), true) => stats.files_copied += 1,
                (SyncAction::Delete(_), true) => stats.files_removed += 1,
                (_, false) => stats.failures += 1,
            }
            outcomes.push(outcome);
        }

        stats.duration = started.elapsed();
        events.info(&format!(
            "Synchronization finished: {} copied, {} removed, {} unchanged, {} failed in {:.2?}",
            stats.files_copied, stats.files_removed, stats.files_unchanged, stats.failures,
            stats.duration
        ));

        Ok(PassSummary {
            pass_id: uuid::Uuid::new_v4(),
            stats,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrcp_types::NullSink;
    use tempfile::TempDir;

    fn engine(source: &TempDir, replica: &TempDir) -> MirrorEngine {
        MirrorEngine::new(source.path(), replica.path())
    }

    #[test]
    fn missing_source_root_is_fatal_and_mutates_nothing() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(replica.path().join("keep.txt"), b"untouched").unwrap();
        let engine = MirrorEngine::new(&source.path().join("absent"), &replica.path().to_path_buf());

        let result = engine.run_pass(&NullSink);

        match result {
            Err(error) => assert!(error.is_fatal_to_pass()),
            Ok(_) => panic!("pass should abort when the source root is missing"),
        }
        assert_eq!(
            fs::read(replica.path().join("keep.txt")).unwrap(),
            b"untouched"
        );
    }

    #[test]
    fn source_root_must_be_a_directory() {
        let parent = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        let source_file = parent.path().join("source.txt");
        fs::write(&source_file, b"not a directory").unwrap();
        let engine = MirrorEngine::new(source_file, replica.path().to_path_buf());

        let result = engine.run_pass(&NullSink);
        assert!(matches!(result, Err(Error::SourceNotDirectory { .. })));
    }

    #[test]
    fn replica_path_occupied_by_a_file_is_fatal() {
        let source = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        let replica_file = parent.path().join("replica");
        fs::write(&replica_file, b"in the way").unwrap();
        let engine = MirrorEngine::new(source.path().to_path_buf(), replica_file);

        let result = engine.run_pass(&NullSink);
        assert!(matches!(result, Err(Error::ReplicaCreate { .. })));
    }

    #[test]
    fn missing_replica_root_is_created() {
        let source = TempDir::new().unwrap();
        let replica_parent = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), b"hello").unwrap();
        let replica = replica_parent.path().join("replica");
        let engine = MirrorEngine::new(source.path().to_path_buf(), replica.clone());

        let summary = engine.run_pass(&NullSink).unwrap();

        assert!(replica.is_dir());
        assert_eq!(summary.stats.files_copied, 1);
        assert_eq!(fs::read(replica.join("a.txt")).unwrap(), b"hello");
    }

    #[test]
    fn pass_counts_unchanged_files() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("same.txt"), b"same").unwrap();
        fs::write(replica.path().join("same.txt"), b"same").unwrap();
        fs::write(source.path().join("new.txt"), b"new").unwrap();

        let summary = engine(&source, &replica).run_pass(&NullSink).unwrap();

        assert_eq!(summary.stats.files_unchanged, 1);
        assert_eq!(summary.stats.files_copied, 1);
        assert!(summary.is_clean());
    }

    #[test]
    fn summary_outcomes_follow_plan_order() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), b"a").unwrap();
        fs::write(replica.path().join("z.txt"), b"z").unwrap();

        let summary = engine(&source, &replica).run_pass(&NullSink).unwrap();

        assert_eq!(summary.outcomes.len(), 2);
        assert!(matches!(summary.outcomes[0].action, SyncAction::Copy(_)));
        assert!(matches!(summary.outcomes[1].action, SyncAction::Delete(_)));
    }
}
