use crate::api::*;
use crate::config::Config;
use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Blocking client for the remote snapshot service's JSON-over-HTTP API.
///
/// Request signing and retry policy are the remote SDK's business, not ours;
/// credentials travel as plain headers and every call is a single round-trip.
pub struct HttpClient {
    agent: ureq::Agent,
    endpoint: String,
    key: String,
    secret: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(60))
            .build();

        Self {
            agent,
            endpoint: config.api_endpoint.clone(),
            key: config.api_key.clone(),
            secret: config.api_secret.clone(),
        }
    }

    fn call<T>(&self, command: &str, params: &[(&str, &str)]) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .query("command", command)
            .set("X-API-Key", &self.key)
            .set("X-API-Secret", &self.secret);

        for (param, value) in params {
            request = request.query(param, value);
        }

        let response = match request.call() {
            Ok(response) => response,

            Err(ureq::Error::Status(code, response)) => {
                return Err(ApiError::Other(anyhow!(
                    "`{}` failed with status {}: {}",
                    command,
                    code,
                    error_message(response),
                )));
            }

            Err(err) => {
                return Err(ApiError::Other(
                    anyhow::Error::new(err).context(format!("Couldn't call `{}`", command)),
                ));
            }
        };

        response
            .into_json()
            .with_context(|| format!("Couldn't parse the response of `{}`", command))
            .map_err(ApiError::Other)
    }
}

impl ComputeClient for HttpClient {
    fn instance_volume(&mut self, instance: &InstanceId) -> ApiResult<Volume> {
        let response: VolumesResponse =
            self.call("listVolumes", &[("instance", instance.as_str())])?;

        response
            .volumes
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NoSuchInstance {
                instance: instance.to_owned(),
            })
    }

    fn snapshots(&mut self, volume: &VolumeId) -> ApiResult<Vec<Snapshot>> {
        let response: SnapshotsResponse =
            self.call("listSnapshots", &[("volume", volume.as_str())])?;

        Ok(response.snapshots)
    }

    fn create_snapshot(&mut self, volume: &VolumeId) -> ApiResult<Operation> {
        let response: OperationResponse =
            self.call("createSnapshot", &[("volume", volume.as_str())])?;

        Ok(response.operation)
    }

    fn delete_snapshot(&mut self, snapshot: &SnapshotId) -> ApiResult<Operation> {
        let response: OperationResponse =
            self.call("deleteSnapshot", &[("snapshot", snapshot.as_str())])?;

        Ok(response.operation)
    }

    fn tag_snapshot(
        &mut self,
        snapshot: &SnapshotId,
        key: &str,
        value: &str,
    ) -> ApiResult<Operation> {
        let response: OperationResponse = self.call(
            "tagSnapshot",
            &[("snapshot", snapshot.as_str()), ("key", key), ("value", value)],
        )?;

        Ok(response.operation)
    }

    fn poll_operation(&mut self, operation: &OperationId) -> ApiResult<Operation> {
        let response: OperationResponse =
            self.call("queryOperation", &[("operation", operation.as_str())])?;

        Ok(response.operation)
    }
}

fn error_message(response: ureq::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: String,
    }

    response
        .into_string()
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorResponse>(&body).ok())
        .map(|response| response.error)
        .unwrap_or_else(|| "(no error message)".to_string())
}

#[derive(Deserialize)]
struct VolumesResponse {
    volumes: Vec<Volume>,
}

#[derive(Deserialize)]
struct SnapshotsResponse {
    snapshots: Vec<Snapshot>,
}

#[derive(Deserialize)]
struct OperationResponse {
    operation: Operation,
}
