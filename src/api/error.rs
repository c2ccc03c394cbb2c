use crate::api::{InstanceId, OperationId, SnapshotId, VolumeId};
use std::result;
use thiserror::Error;

pub type ApiResult<T> = result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No volume found for instance: {instance}")]
    NoSuchInstance { instance: InstanceId },

    #[error("No such volume: {volume}")]
    NoSuchVolume { volume: VolumeId },

    #[error("No such snapshot: {snapshot}")]
    NoSuchSnapshot { snapshot: SnapshotId },

    #[error("No such operation: {operation}")]
    NoSuchOperation { operation: OperationId },

    #[error("Operation failed remotely: {operation}")]
    OperationFailed { operation: OperationId },

    #[cfg(test)]
    #[error("InjectedError")]
    InjectedError,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
impl PartialEq<ApiError> for ApiError {
    fn eq(&self, other: &ApiError) -> bool {
        self.to_string() == other.to_string()
    }
}
