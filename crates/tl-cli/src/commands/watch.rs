//! Watch command: re-reads the journal whenever it changes on disk.
//!
//! The journal's directory is watched rather than the file itself, so
//! editors that replace the file on save are still picked up.

use std::io::Write;
use std::path::Path;
use std::sync::mpsc;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::status::{StatusReport, render};
use super::util::{open_journal, resolve_now};
use crate::Config;

/// Returns true if `event` created or modified the journal file.
pub fn is_journal_change(event: &Event, journal_path: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == journal_path.file_name())
}

pub fn run<W: Write>(writer: &mut W, config: &Config, now_arg: Option<&str>) -> Result<()> {
    let path = config.journal_path.as_path();
    let now = resolve_now(now_arg)?;
    let mut journal = open_journal(path, now)?;
    render(writer, &StatusReport::new(journal.stats(), config, now))?;

    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx).context("failed to create file watcher")?;
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "watching journal directory");

    for result in rx {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "file watcher error");
                continue;
            }
        };
        if !is_journal_change(&event, path) {
            continue;
        }

        let now = resolve_now(now_arg)?;
        match journal.reload(path, now) {
            Ok(()) => {
                writeln!(writer)?;
                render(writer, &StatusReport::new(journal.stats(), config, now))?;
            }
            Err(partial) => {
                let error = anyhow::Error::from(partial);
                tracing::warn!(error = %format!("{error:#}"), "reload failed, keeping previous state");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn journal_writes_trigger_reload() {
        let journal = Path::new("/data/tl/timelog.txt");

        assert!(is_journal_change(
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Any)),
                "/data/tl/timelog.txt"
            ),
            journal
        ));
        assert!(is_journal_change(
            &event(EventKind::Create(CreateKind::File), "/data/tl/timelog.txt"),
            journal
        ));
    }

    #[test]
    fn other_files_and_kinds_are_ignored() {
        let journal = Path::new("/data/tl/timelog.txt");

        assert!(!is_journal_change(
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Any)),
                "/data/tl/project-list.txt"
            ),
            journal
        ));
        assert!(!is_journal_change(
            &event(EventKind::Access(AccessKind::Any), "/data/tl/timelog.txt"),
            journal
        ));
        assert!(!is_journal_change(
            &event(EventKind::Remove(RemoveKind::File), "/data/tl/timelog.txt"),
            journal
        ));
    }
}
