use crate::prelude::*;
use itertools::Itertools;

/// Filters to the snapshots this tool is allowed to rotate - backed-up ones
/// matching the configured filter strategy - sorted newest-first; ties broken
/// by id, so repeated runs pick the same deletion candidates.
pub fn find_autosnapshots(config: &Config, snapshots: &[Snapshot]) -> Vec<Snapshot> {
    snapshots
        .iter()
        .filter(|snapshot| snapshot.state == SnapshotState::BackedUp)
        .filter(|snapshot| config.is_autosnapshot(snapshot))
        .cloned()
        .sorted_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
        .collect()
}
