use crate::api::{SnapshotId, SnapshotState, VolumeId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub volume: VolumeId,
    pub created_at: DateTime<Utc>,
    pub state: SnapshotState,
    #[serde(default)]
    pub tags: IndexMap<String, String>,
}
