use crate::api::utils::datetime;
use crate::api::*;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// In-memory stand-in for the remote snapshot service.
///
/// Mutations apply eagerly; the returned operations only model how the remote
/// side *reports* them - `set_operation_latency` makes them come back as
/// pending for a number of polls, `fail_next_operation` makes the next one
/// finish in the `Failure` state without applying its mutation.
#[derive(Debug, Default)]
pub struct FakeClient {
    volumes: BTreeMap<InstanceId, VolumeId>,
    snapshots: BTreeMap<SnapshotId, Snapshot>,
    operations: BTreeMap<OperationId, PendingOperation>,
    errors: HashSet<FakeError<'static>>,
    operation_latency: usize,
    fail_next_operation: bool,
    next_snapshot: usize,
    next_operation: usize,
}

impl FakeClient {
    pub fn add_instance(&mut self, instance: &str, volume: &str) {
        self.volumes
            .insert(InstanceId::new(instance), VolumeId::new(volume));
    }

    pub fn add(&mut self, snapshot: FakeSnapshot<'_>) {
        let mut tags = indexmap::IndexMap::new();

        if snapshot.tagged {
            tags.insert("autosnap".to_string(), "true".to_string());
        }

        self.snapshots.insert(
            SnapshotId::new(snapshot.id),
            Snapshot {
                id: SnapshotId::new(snapshot.id),
                volume: VolumeId::new(snapshot.volume),
                created_at: datetime(snapshot.created_at),
                state: snapshot.state,
                tags,
            },
        );
    }

    pub fn inject_error(&mut self, error: FakeError<'static>) {
        self.errors.insert(error);
    }

    pub fn fail_next_operation(&mut self) {
        self.fail_next_operation = true;
    }

    pub fn set_operation_latency(&mut self, polls: usize) {
        self.operation_latency = polls;
    }

    /// Returns the operation as handed to the caller; the terminal form is
    /// kept aside until enough polls have drained the configured latency.
    fn operation(&mut self, state: OperationState, snapshot: Option<SnapshotId>) -> Operation {
        self.next_operation += 1;

        let id = OperationId::new(format!("op-{}", self.next_operation));

        let terminal = Operation {
            id: id.clone(),
            state,
            snapshot,
        };

        if self.operation_latency == 0 {
            return terminal;
        }

        self.operations.insert(
            id.clone(),
            PendingOperation {
                terminal,
                polls_left: self.operation_latency,
            },
        );

        Operation {
            id,
            state: OperationState::Pending,
            snapshot: None,
        }
    }

    fn take_failure(&mut self) -> bool {
        let failed = self.fail_next_operation;
        self.fail_next_operation = false;
        failed
    }
}

impl ComputeClient for FakeClient {
    fn instance_volume(&mut self, instance: &InstanceId) -> ApiResult<Volume> {
        self.volumes
            .get(instance)
            .cloned()
            .map(|id| Volume { id })
            .ok_or_else(|| ApiError::NoSuchInstance {
                instance: instance.to_owned(),
            })
    }

    fn snapshots(&mut self, volume: &VolumeId) -> ApiResult<Vec<Snapshot>> {
        let snapshots = self
            .snapshots
            .values()
            .filter(|snapshot| &snapshot.volume == volume)
            .cloned()
            .collect();

        Ok(snapshots)
    }

    fn create_snapshot(&mut self, volume: &VolumeId) -> ApiResult<Operation> {
        if self.errors.contains(&FakeError::OnCreateSnapshot {
            volume: volume.as_str(),
        }) {
            return Err(ApiError::InjectedError);
        }

        if !self.volumes.values().any(|known| known == volume) {
            return Err(ApiError::NoSuchVolume {
                volume: volume.to_owned(),
            });
        }

        if self.take_failure() {
            return Ok(self.operation(OperationState::Failure, None));
        }

        self.next_snapshot += 1;

        let id = SnapshotId::new(format!("snap-{}", self.next_snapshot));

        self.snapshots.insert(
            id.clone(),
            Snapshot {
                id: id.clone(),
                volume: volume.to_owned(),
                created_at: Utc::now(),
                state: SnapshotState::BackedUp,
                tags: Default::default(),
            },
        );

        Ok(self.operation(OperationState::Success, Some(id)))
    }

    fn delete_snapshot(&mut self, snapshot: &SnapshotId) -> ApiResult<Operation> {
        if self.errors.contains(&FakeError::OnDeleteSnapshot {
            snapshot: snapshot.as_str(),
        }) {
            return Err(ApiError::InjectedError);
        }

        if self.take_failure() {
            return Ok(self.operation(OperationState::Failure, None));
        }

        if self.snapshots.remove(snapshot).is_none() {
            return Err(ApiError::NoSuchSnapshot {
                snapshot: snapshot.to_owned(),
            });
        }

        Ok(self.operation(OperationState::Success, Some(snapshot.to_owned())))
    }

    fn tag_snapshot(
        &mut self,
        snapshot: &SnapshotId,
        key: &str,
        value: &str,
    ) -> ApiResult<Operation> {
        if self.errors.contains(&FakeError::OnTagSnapshot {
            snapshot: snapshot.as_str(),
        }) {
            return Err(ApiError::InjectedError);
        }

        if self.take_failure() {
            return Ok(self.operation(OperationState::Failure, None));
        }

        let snapshot_obj =
            self.snapshots
                .get_mut(snapshot)
                .ok_or_else(|| ApiError::NoSuchSnapshot {
                    snapshot: snapshot.to_owned(),
                })?;

        snapshot_obj.tags.insert(key.to_string(), value.to_string());

        Ok(self.operation(OperationState::Success, Some(snapshot.to_owned())))
    }

    fn poll_operation(&mut self, operation: &OperationId) -> ApiResult<Operation> {
        let pending =
            self.operations
                .get_mut(operation)
                .ok_or_else(|| ApiError::NoSuchOperation {
                    operation: operation.to_owned(),
                })?;

        if pending.polls_left > 1 {
            pending.polls_left -= 1;

            return Ok(Operation {
                id: operation.to_owned(),
                state: OperationState::Pending,
                snapshot: None,
            });
        }

        let pending = self.operations.remove(operation).unwrap();

        Ok(pending.terminal)
    }
}

impl fmt::Display for FakeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (instance, volume)) in self.volumes.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }

            writeln!(f, "{}:{}", instance, volume)?;

            for snapshot in self.snapshots.values() {
                if &snapshot.volume != volume {
                    continue;
                }

                write!(f, "-> {} ({:?})", snapshot.id, snapshot.state)?;

                for (key, value) in &snapshot.tags {
                    write!(f, " {}={}", key, value)?;
                }

                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
struct PendingOperation {
    terminal: Operation,
    polls_left: usize,
}

#[derive(Clone, Debug)]
pub struct FakeSnapshot<'a> {
    pub id: &'a str,
    pub volume: &'a str,
    pub created_at: &'a str,
    pub state: SnapshotState,
    pub tagged: bool,
}

impl Default for FakeSnapshot<'static> {
    fn default() -> Self {
        Self {
            id: "",
            volume: "vol-1",
            created_at: "2000-01-01 12:00:00",
            state: SnapshotState::BackedUp,
            tagged: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FakeError<'a> {
    OnCreateSnapshot { volume: &'a str },
    OnDeleteSnapshot { snapshot: &'a str },
    OnTagSnapshot { snapshot: &'a str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::utils::*;
    use pretty_assertions as pa;

    fn client() -> FakeClient {
        let mut client = FakeClient::default();

        client.add_instance("instance-1", "vol-1");
        client.add_instance("instance-2", "vol-2");

        client.add(FakeSnapshot {
            id: "auto-1",
            created_at: "2000-01-01 13:00:00",
            ..Default::default()
        });

        client.add(FakeSnapshot {
            id: "manual-1",
            created_at: "2000-01-01 14:00:00",
            tagged: false,
            ..Default::default()
        });

        client.add(FakeSnapshot {
            id: "other-1",
            volume: "vol-2",
            created_at: "2000-01-01 15:00:00",
            ..Default::default()
        });

        client
    }

    mod instance_volume {
        use super::*;

        #[test]
        fn ok() {
            let mut client = client();

            pa::assert_eq!(
                Ok(Volume {
                    id: volume_id("vol-1")
                }),
                client.instance_volume(&instance_id("instance-1"))
            );
        }

        #[test]
        fn given_unknown_instance() {
            let mut client = client();

            let expected = ApiError::NoSuchInstance {
                instance: instance_id("unknown"),
            };

            pa::assert_eq!(
                Err(expected),
                client.instance_volume(&instance_id("unknown"))
            );
        }
    }

    mod snapshots {
        use super::*;

        #[test]
        fn returns_only_snapshots_of_given_volume() {
            let mut client = client();

            let actual: Vec<_> = client
                .snapshots(&volume_id("vol-2"))
                .unwrap()
                .into_iter()
                .map(|snapshot| snapshot.id)
                .collect();

            pa::assert_eq!(vec![snapshot_id("other-1")], actual);
        }

        #[test]
        fn given_unknown_volume() {
            let mut client = client();

            pa::assert_eq!(Ok(vec![]), client.snapshots(&volume_id("unknown")));
        }
    }

    mod create_snapshot {
        use super::*;

        #[test]
        fn ok() {
            let mut client = client();

            let operation = client.create_snapshot(&volume_id("vol-1")).unwrap();

            assert_eq!(OperationState::Success, operation.state);
            assert_eq!(Some(snapshot_id("snap-1")), operation.snapshot);
            assert!(client.snapshots.contains_key(&snapshot_id("snap-1")));
        }

        #[test]
        fn given_unknown_volume() {
            let actual = client()
                .create_snapshot(&volume_id("unknown"))
                .unwrap_err();

            let expected = ApiError::NoSuchVolume {
                volume: volume_id("unknown"),
            };

            pa::assert_eq!(expected, actual);
        }

        #[test]
        fn given_injected_error() {
            let mut client = client();

            client.inject_error(FakeError::OnCreateSnapshot { volume: "vol-1" });

            let actual = client.create_snapshot(&volume_id("vol-1")).unwrap_err();

            pa::assert_eq!(ApiError::InjectedError, actual);
        }

        #[test]
        fn given_failing_operation_applies_no_mutation() {
            let mut client = client();

            client.fail_next_operation();

            let operation = client.create_snapshot(&volume_id("vol-1")).unwrap();

            assert_eq!(OperationState::Failure, operation.state);
            assert!(!client.snapshots.contains_key(&snapshot_id("snap-1")));
        }
    }

    mod delete_snapshot {
        use super::*;

        #[test]
        fn ok() {
            let mut client = client();

            let operation = client.delete_snapshot(&snapshot_id("auto-1")).unwrap();

            assert_eq!(OperationState::Success, operation.state);
            assert!(!client.snapshots.contains_key(&snapshot_id("auto-1")));
        }

        #[test]
        fn given_unknown_snapshot() {
            let actual = client().delete_snapshot(&snapshot_id("unknown")).unwrap_err();

            let expected = ApiError::NoSuchSnapshot {
                snapshot: snapshot_id("unknown"),
            };

            pa::assert_eq!(expected, actual);
        }
    }

    mod tag_snapshot {
        use super::*;

        #[test]
        fn ok() {
            let mut client = client();

            client
                .tag_snapshot(&snapshot_id("manual-1"), "autosnap", "true")
                .unwrap();

            let snapshot = &client.snapshots[&snapshot_id("manual-1")];

            assert_eq!(Some(&"true".to_string()), snapshot.tags.get("autosnap"));
        }

        #[test]
        fn given_unknown_snapshot() {
            let actual = client()
                .tag_snapshot(&snapshot_id("unknown"), "autosnap", "true")
                .unwrap_err();

            let expected = ApiError::NoSuchSnapshot {
                snapshot: snapshot_id("unknown"),
            };

            pa::assert_eq!(expected, actual);
        }
    }

    #[test]
    fn display() {
        let client = client();

        pa::assert_str_eq!(
            indoc::indoc!(
                r#"
                instance-1:vol-1
                -> auto-1 (BackedUp) autosnap=true
                -> manual-1 (BackedUp)

                instance-2:vol-2
                -> other-1 (BackedUp) autosnap=true
                "#
            ),
            client.to_string()
        );
    }
}
