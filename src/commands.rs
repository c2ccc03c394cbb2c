mod rotate;
mod take;

pub use self::{rotate::*, take::*};

use crate::prelude::*;

/// Runs a full snapshot cycle against the instance's volume.
///
/// Rotation completes in full - every delete waited upon - before the new
/// snapshot gets created, so a snapshot taken by this run can never become
/// its own rotation candidate.
pub fn run(env: &mut Environment) -> Result<()> {
    let volume = env
        .api
        .instance_volume(&env.config.instance)
        .context("Couldn't find the instance's volume")?;

    Rotate::new(env, &volume).run()?;
    writeln!(env.stdout)?;
    Take::new(env, &volume).run()?;

    Ok(())
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_out {
    ($expected:literal, $actual:expr) => {
        pa::assert_str_eq!(indoc::indoc!($expected), String::from_utf8_lossy(&$actual));
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_err {
    ($expected:literal, $actual:expr) => {
        let actual = format!("{:?}", $actual.unwrap_err());

        pa::assert_str_eq!(indoc::indoc!($expected).trim(), actual);
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_api {
    ($expected:literal, $actual:expr) => {
        pa::assert_str_eq!(indoc::indoc!($expected), $actual.to_string());
    };
}
