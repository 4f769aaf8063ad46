//! Init command for creating the journal file.

use std::io::Write;

use anyhow::Result;

use crate::Config;

/// Runs the init command.
pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let created = tl_core::ensure_exists(&config.journal_path)?;

    let state = if created { "created" } else { "already exists" };
    writeln!(
        writer,
        "Journal: {} ({state})",
        config.journal_path.display()
    )?;

    Ok(())
}
