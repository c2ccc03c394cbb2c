use anyhow::Result;
use std::io::Write;

#[derive(Default)]
pub struct Summary {
    pub matching_snapshots: usize,
    pub kept_snapshots: usize,
    pub deleted_snapshots: usize,
}

impl Summary {
    pub fn print(self, stdout: &mut dyn Write) -> Result<()> {
        writeln!(stdout)?;
        writeln!(stdout, "Summary")?;
        writeln!(stdout, "- matching snapshots: {}", self.matching_snapshots)?;
        writeln!(stdout, "- kept snapshots: {}", self.kept_snapshots)?;
        writeln!(stdout, "- deleted snapshots: {}", self.deleted_snapshots)?;

        Ok(())
    }
}
