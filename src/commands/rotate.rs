mod find_autosnapshots;
mod find_snapshots_to_keep;
mod summary;

use self::{find_autosnapshots::*, find_snapshots_to_keep::*, summary::*};
use crate::prelude::*;
use tracing::debug;

/// Deletes the oldest autosnapshots so that at most `retention` of them
/// remain on the volume.
pub struct Rotate<'a, 'b> {
    env: &'a mut Environment<'b>,
    volume: &'a Volume,
}

impl<'a, 'b> Rotate<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, volume: &'a Volume) -> Self {
        Self { env, volume }
    }

    pub fn run(mut self) -> Result<()> {
        writeln!(self.env.stdout, "Rotating snapshots:")?;

        let snapshots = self
            .env
            .api
            .snapshots(&self.volume.id)
            .context("Couldn't list snapshots")?;

        let snapshots = find_autosnapshots(self.env.config, &snapshots);
        let to_keep = find_snapshots_to_keep(&snapshots, self.env.config.retention);

        let mut summary = Summary {
            matching_snapshots: snapshots.len(),
            ..Default::default()
        };

        for snapshot in &snapshots {
            debug!(id = %snapshot.id, "found snapshot");

            if to_keep.contains(&snapshot.id) {
                summary.kept_snapshots += 1;

                writeln!(self.env.stdout, "-> keeping snapshot: {}", snapshot.id)?;
            } else {
                self.delete(snapshot)?;

                summary.deleted_snapshots += 1;
            }
        }

        summary.print(self.env.stdout)
    }

    fn delete(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.env.dry_run {
            writeln!(
                self.env.stdout,
                "-> [dry-run] deleting snapshot: {}",
                snapshot.id
            )?;

            return Ok(());
        }

        writeln!(self.env.stdout, "-> deleting snapshot: {}", snapshot.id)?;

        let result: Result<()> = (|| {
            let operation = self.env.api.delete_snapshot(&snapshot.id)?;

            wait_for_operation(self.env.api, operation)?;

            Ok(())
        })();

        result.with_context(|| format!("Couldn't delete snapshot: {}", snapshot.id))
    }
}
