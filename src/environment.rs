use crate::prelude::*;
use std::io::Write;

pub struct Environment<'a> {
    pub stdout: &'a mut dyn Write,
    pub config: &'a Config,
    pub api: &'a mut dyn ComputeClient,
    pub dry_run: bool,
}

impl<'a> Environment<'a> {
    #[cfg(test)]
    pub fn test(
        stdout: &'a mut dyn Write,
        config: &'a Config,
        api: &'a mut dyn ComputeClient,
    ) -> Self {
        Self {
            stdout,
            config,
            api,
            dry_run: false,
        }
    }
}
