//! Log command: records that a task just ended.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use tl_core::{Journal, JournalError, ProjectTree};

use super::util::{format_duration, open_journal};
use crate::Config;

/// Builds the entry description, prefixing the project when given.
pub fn compose_description(project: Option<&str>, words: &[String]) -> String {
    let text = words.join(" ");
    match project {
        Some(project) => format!("{project}: {text}"),
        None => text,
    }
}

/// Warns when `project` is not in the project list. A missing list is fine.
fn check_project(config: &Config, project: &str) {
    let tree = match ProjectTree::load(&config.project_list_path) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::debug!(error = %e, "project list unavailable");
            return;
        }
    };

    let labels: Vec<&str> = project.split(':').collect();
    if tree.find_path(&labels).is_none() {
        tracing::warn!(project, "project not found in project list");
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    now: DateTime<FixedOffset>,
    project: Option<&str>,
    words: &[String],
) -> Result<()> {
    if let Some(project) = project {
        check_project(config, project);
    }
    let description = compose_description(project, words);

    let mut journal = open_journal(&config.journal_path, now)?;
    record_entry(writer, &mut journal, &config.journal_path, &description, now)
}

/// Records `description` into `journal` and reports the new entry.
fn record_entry<W: Write>(
    writer: &mut W,
    journal: &mut Journal,
    journal_path: &Path,
    description: &str,
    now: DateTime<FixedOffset>,
) -> Result<()> {
    let entry = match journal.record(description, now, journal_path) {
        Ok(entry) => entry,
        Err(e @ JournalError::Append { .. }) => {
            return Err(e).context("entry was NOT saved to the journal");
        }
        Err(e) => return Err(e.into()),
    };

    writeln!(
        writer,
        "{} {} ({})",
        entry.end_time.format("%H:%M"),
        entry.description,
        format_duration(entry.duration)
    )?;
    Ok(())
}
