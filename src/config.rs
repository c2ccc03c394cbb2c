mod credentials;

pub use self::credentials::*;

use crate::api::{InstanceId, Snapshot};
use clap::ValueEnum;

/// Per-run settings; built once in `main`, read-only afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_endpoint: String,
    pub api_key: String,
    pub api_secret: String,
    pub instance: InstanceId,
    pub retention: usize,
    pub filter: SnapshotFilter,
}

impl Config {
    pub const TAG_KEY: &'static str = "autosnap";
    pub const TAG_VALUE: &'static str = "true";

    #[cfg(test)]
    pub fn test(retention: usize) -> Self {
        Self {
            api_endpoint: Default::default(),
            api_key: Default::default(),
            api_secret: Default::default(),
            instance: InstanceId::new("instance-1"),
            retention,
            filter: SnapshotFilter::Tagged,
        }
    }

    /// Decides whether `snapshot` is ours to rotate; snapshots a user created
    /// by hand must never count towards retention under the default strategy.
    pub fn is_autosnapshot(&self, snapshot: &Snapshot) -> bool {
        match self.filter {
            SnapshotFilter::Tagged => snapshot.tags.contains_key(Self::TAG_KEY),
            SnapshotFilter::All => true,
        }
    }

    pub fn scrambled_secret(&self) -> String {
        scramble(&self.api_secret)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFilter {
    /// Only snapshots carrying the ownership tag count towards retention
    Tagged,

    /// Every backed-up snapshot on the volume counts towards retention,
    /// including untagged ones
    All,
}

/// Replaces everything but the first and the last character with `*`, so
/// secrets can show up in debug output without leaking.
fn scramble(s: &str) -> String {
    match s.chars().count() {
        0 => String::new(),
        1 => "*".to_string(),

        n => s
            .chars()
            .enumerate()
            .map(|(idx, char)| if idx == 0 || idx == n - 1 { char } else { '*' })
            .collect(),
    }
}
