//! Snapshot reconciliation
//!
//! The pure diff step at the heart of a pass: compare a source snapshot with
//! a replica snapshot and emit the copy and delete actions that make the
//! replica match the source. No I/O happens here.

use crate::snapshot::TreeSnapshot;
use mirrcp_types::SyncAction;

/// Compute the action plan that reconciles `replica` onto `source`.
///
/// Keys present in source but absent from the replica, or present with a
/// non-matching digest, produce a [`SyncAction::Copy`]; an unavailable digest
/// on either side counts as non-matching, so an unreadable file is retried on
/// every pass until it can be read. Keys present only in the replica produce
/// a [`SyncAction::Delete`]. Keys with equal available digests produce
/// nothing, which is what keeps unchanged files untouched.
///
/// Copies are emitted before deletes, each group in sorted key order; the two
/// groups operate on disjoint key sets by construction.
pub fn plan(source: &TreeSnapshot, replica: &TreeSnapshot) -> Vec<SyncAction> {
    let mut actions = Vec::new();

    for (key, digest) in source.iter() {
        let unchanged = replica
            .get(key)
            .is_some_and(|replica_digest| replica_digest.matches(digest));
        if !unchanged {
            actions.push(SyncAction::Copy(key.clone()));
        }
    }

    for key in replica.keys() {
        if !source.contains(key) {
            actions.push(SyncAction::Delete(key.clone()));
        }
    }

    actions
}
