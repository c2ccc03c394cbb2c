pub use crate::api::*;
pub use crate::config::{Config, SnapshotFilter};
pub use crate::environment::Environment;
pub use anyhow::{anyhow, bail, Context, Result};
pub use chrono::{DateTime, Utc};
pub use std::io::Write;

#[cfg(test)]
pub use indoc::indoc;

#[cfg(test)]
pub use pretty_assertions as pa;
