use crate::prelude::*;
use tracing::debug;

/// Creates a new snapshot of the volume and tags it, so that future
/// rotations can tell it apart from snapshots a user created by hand.
pub struct Take<'a, 'b> {
    env: &'a mut Environment<'b>,
    volume: &'a Volume,
}

impl<'a, 'b> Take<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, volume: &'a Volume) -> Self {
        Self { env, volume }
    }

    pub fn run(mut self) -> Result<Option<SnapshotId>> {
        writeln!(self.env.stdout, "Creating snapshot:")?;

        if self.env.dry_run {
            writeln!(self.env.stdout, "-> [dry-run] creating snapshot")?;

            return Ok(None);
        }

        let snapshot = self.create().context("Couldn't create snapshot")?;

        if let Err(err) = self.tag(&snapshot) {
            // An untagged snapshot is invisible to rotation and would pile up
            // forever, so try to take it down with us; if even that fails, an
            // orphaned snapshot is the accepted risk
            self.cleanup(&snapshot);

            return Err(err).with_context(|| format!("Couldn't tag snapshot: {}", snapshot));
        }

        writeln!(self.env.stdout, "-> created snapshot: {}", snapshot)?;

        Ok(Some(snapshot))
    }

    fn create(&mut self) -> Result<SnapshotId> {
        let operation = self.env.api.create_snapshot(&self.volume.id)?;
        let operation = wait_for_operation(self.env.api, operation)?;

        operation
            .snapshot
            .ok_or_else(|| anyhow!("The create operation didn't report a snapshot id"))
    }

    fn tag(&mut self, snapshot: &SnapshotId) -> Result<()> {
        let operation = self
            .env
            .api
            .tag_snapshot(snapshot, Config::TAG_KEY, Config::TAG_VALUE)?;

        wait_for_operation(self.env.api, operation)?;

        Ok(())
    }

    fn cleanup(&mut self, snapshot: &SnapshotId) {
        let result: Result<()> = (|| {
            let operation = self.env.api.delete_snapshot(snapshot)?;

            wait_for_operation(self.env.api, operation)?;

            Ok(())
        })();

        if let Err(err) = result {
            debug!(%snapshot, "couldn't clean up the untagged snapshot: {:?}", err);
        }
    }
}
