mod instance_id;
mod operation;
mod operation_id;
mod operation_state;
mod snapshot;
mod snapshot_id;
mod snapshot_state;
mod volume;
mod volume_id;

pub use self::{
    instance_id::*, operation::*, operation_id::*, operation_state::*, snapshot::*, snapshot_id::*,
    snapshot_state::*, volume::*, volume_id::*,
};
