use crate::api::{OperationId, OperationState, SnapshotId};
use serde::Deserialize;

/// An asynchronous remote job; `snapshot` points at the affected resource
/// once the remote service reports it (always set for create operations).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub state: OperationState,
    #[serde(default)]
    pub snapshot: Option<SnapshotId>,
}
