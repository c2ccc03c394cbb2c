use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().into())
    }

    /// Validates and wraps an instance id coming from the outside world - the
    /// `--instance-id` flag or the metadata service; the remote API only knows
    /// instances by UUID, so anything else gets rejected before the first
    /// remote call.
    pub fn parse(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();

        Uuid::parse_str(id).map_err(|_| anyhow!("Invalid instance id (expected a UUID): {}", id))?;

        Ok(Self(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
