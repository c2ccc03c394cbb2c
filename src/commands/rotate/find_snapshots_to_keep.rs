use crate::prelude::*;
use indexmap::IndexSet;

/// Returns ids of the `retention` newest snapshots; `snapshots` must already
/// be sorted newest-first. Everything past the threshold is a deletion
/// candidate - the input ordering guarantees those are the oldest ones.
pub fn find_snapshots_to_keep(snapshots: &[Snapshot], retention: usize) -> IndexSet<&SnapshotId> {
    snapshots
        .iter()
        .take(retention)
        .map(|snapshot| &snapshot.id)
        .collect()
}
