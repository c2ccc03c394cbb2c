mod clients;
mod error;
mod models;

pub use self::{clients::*, error::*, models::*};

use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// A narrow, typed view of the remote snapshot service; every mutating call
/// returns an [`Operation`] that has to be polled to a terminal state before
/// the caller may proceed.
pub trait ComputeClient {
    fn instance_volume(&mut self, instance: &InstanceId) -> ApiResult<Volume>;

    fn snapshots(&mut self, volume: &VolumeId) -> ApiResult<Vec<Snapshot>>;

    fn create_snapshot(&mut self, volume: &VolumeId) -> ApiResult<Operation>;

    fn delete_snapshot(&mut self, snapshot: &SnapshotId) -> ApiResult<Operation>;

    fn tag_snapshot(&mut self, snapshot: &SnapshotId, key: &str, value: &str)
        -> ApiResult<Operation>;

    fn poll_operation(&mut self, operation: &OperationId) -> ApiResult<Operation>;
}

/// Blocks until `operation` reaches a terminal state; an operation ending up
/// in the `Failure` state comes back as [`ApiError::OperationFailed`].
///
/// There is no client-side timeout - the remote service is the only judge of
/// when an operation is done.
pub fn wait_for_operation(api: &mut dyn ComputeClient, operation: Operation) -> ApiResult<Operation> {
    wait_for_operation_every(api, operation, POLL_INTERVAL)
}

fn wait_for_operation_every(
    api: &mut dyn ComputeClient,
    mut operation: Operation,
    interval: Duration,
) -> ApiResult<Operation> {
    loop {
        match operation.state {
            OperationState::Success => return Ok(operation),

            OperationState::Failure => {
                return Err(ApiError::OperationFailed {
                    operation: operation.id,
                });
            }

            OperationState::Pending => {
                thread::sleep(interval);
                operation = api.poll_operation(&operation.id)?;
            }
        }
    }
}
