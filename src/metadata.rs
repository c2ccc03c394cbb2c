use crate::prelude::*;
use tracing::debug;

const METADATA_URL: &str = "http://169.254.169.254/latest/meta-data/vm-id";

/// Asks the instance-local metadata service which instance we are running on;
/// only reachable from inside the cloud, hence `--instance-id` as an escape
/// hatch.
pub fn instance_id(agent: &ureq::Agent) -> Result<InstanceId> {
    debug!("looking up the instance id via the metadata service");

    let id = agent
        .get(METADATA_URL)
        .call()
        .context("Couldn't reach the instance metadata service")?
        .into_string()
        .context("Couldn't read the metadata service's reply")?;

    let id = id.trim();

    if id.is_empty() {
        bail!("The metadata service returned an empty instance id");
    }

    InstanceId::parse(id).context("The metadata service returned an invalid instance id")
}
