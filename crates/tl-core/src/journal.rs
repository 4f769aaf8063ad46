//! Loading and appending the ledger file.
//!
//! The ledger is append-only. Loading always rebuilds every entry and every
//! total from the file's current contents; there is no incremental update.
//!
//! # Partial loads
//!
//! Loading stops at the first malformed line. The entries parsed before it,
//! and the totals folded over them, travel with the error in [`PartialLoad`]
//! so callers can decide whether to carry on with them.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, DurationRound, FixedOffset};
use thiserror::Error;

use crate::entry::{Entry, ParseError, elapsed_same_day, is_arrival_marker, parse_line};
use crate::stats::StatsCollection;

/// Ledger file errors.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The ledger could not be opened or read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The ledger could not be opened for append or written.
    #[error("failed to append to {}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The ledger or its directory could not be created.
    #[error("failed to create {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A ledger line is malformed.
    #[error("{}:{line}: malformed entry", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },

    /// A description that cannot be written as a single ledger line.
    #[error("invalid description {0:?}")]
    InvalidDescription(String),
}

/// A load that stopped early, with everything read before the failure.
#[derive(Debug, Error)]
#[error("ledger loaded partially ({} entries before the failure)", .journal.entries().len())]
pub struct PartialLoad {
    pub journal: Journal,
    #[source]
    pub error: JournalError,
}

/// The in-memory ledger: entries in file order and their folded totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    entries: Vec<Entry>,
    stats: StatsCollection,
}

impl Journal {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub const fn stats(&self) -> &StatsCollection {
        &self.stats
    }

    /// Whether today's arrival marker has been seen.
    pub const fn arrival_handled(&self) -> bool {
        self.stats.arrival_handled()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Entries classified as today, in ledger order.
    pub fn today(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.classification.today)
    }

    fn push(&mut self, entry: Entry) {
        self.stats.fold(&entry);
        self.entries.push(entry);
    }

    /// Records a new entry ending at `now`, truncated to the minute, and
    /// appends it to the ledger.
    ///
    /// The entry is added to the in-memory journal before the write. If the
    /// write fails the entry stays in memory, ahead of the file, and the
    /// error is returned so the caller can report that it was not saved.
    pub fn record(
        &mut self,
        description: &str,
        now: DateTime<FixedOffset>,
        path: &Path,
    ) -> Result<Entry, JournalError> {
        let description = description.trim();
        if description.is_empty() || description.contains(['\n', '\r']) {
            return Err(JournalError::InvalidDescription(description.to_string()));
        }

        // The ledger stores whole minutes.
        let now = now.duration_trunc(Duration::minutes(1)).unwrap_or(now);
        let separator = is_arrival_marker(description) && !self.arrival_handled();
        let duration = self
            .last()
            .map_or_else(Duration::zero, |prev| elapsed_same_day(prev.end_time, now));
        let entry = Entry::new(now, description, duration, now);

        let written = append(&entry, separator, path);
        self.push(entry.clone());
        written.map(|()| entry)
    }

    /// Replaces this journal with the file's current contents.
    ///
    /// On failure the previous state is kept and the partial result is
    /// returned.
    pub fn reload(&mut self, path: &Path, now: DateTime<FixedOffset>) -> Result<(), PartialLoad> {
        *self = load(path, now)?;
        Ok(())
    }
}

/// Reads the whole ledger at `path`, classifying entries against `now`.
pub fn load(path: &Path, now: DateTime<FixedOffset>) -> Result<Journal, PartialLoad> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => {
            return Err(PartialLoad {
                journal: Journal::default(),
                error: JournalError::Read {
                    path: path.to_path_buf(),
                    source,
                },
            });
        }
    };

    let journal = read_from(BufReader::new(file), path, now)?;
    tracing::debug!(
        path = %path.display(),
        entries = journal.entries.len(),
        arrival_handled = journal.arrival_handled(),
        "loaded journal"
    );
    Ok(journal)
}

/// Parses ledger lines from `reader`. `path` is only used in errors.
pub fn read_from<R: BufRead>(
    reader: R,
    path: &Path,
    now: DateTime<FixedOffset>,
) -> Result<Journal, PartialLoad> {
    let mut journal = Journal::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(source) => {
                let error = JournalError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                return Err(PartialLoad { journal, error });
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(trimmed, journal.last(), now) {
            Ok(entry) => journal.push(entry),
            Err(source) => {
                let error = JournalError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                };
                return Err(PartialLoad { journal, error });
            }
        }
    }

    Ok(journal)
}

/// Appends one entry to the ledger at `path`.
///
/// The file must already exist; it is never created or truncated here. With
/// `arrival_separator` a blank line is written first, separating days in the
/// raw file.
pub fn append(entry: &Entry, arrival_separator: bool, path: &Path) -> Result<(), JournalError> {
    let to_error = |source| JournalError::Append {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(to_error)?;

    let mut text = String::new();
    if arrival_separator {
        text.push('\n');
    }
    text.push_str(&entry.to_line());
    text.push('\n');

    file.write_all(text.as_bytes()).map_err(to_error)?;

    tracing::info!(
        path = %path.display(),
        description = %entry.description,
        arrival_separator,
        "appended entry"
    );
    Ok(())
}

/// Creates the ledger and its parent directories if they do not exist.
///
/// Returns `true` if a new, empty ledger was created.
pub fn ensure_exists(path: &Path) -> Result<bool, JournalError> {
    let to_error = |source| JournalError::Create {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            tracing::info!(path = %path.display(), "created journal");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(to_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crate::entry::TIME_LAYOUT;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_str(s, TIME_LAYOUT).unwrap()
    }

    fn ledger(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timelog.txt");
        fs::write(&path, lines.join("\n")).unwrap();
        (dir, path)
    }

    fn durations(journal: &Journal) -> Vec<Duration> {
        journal.entries().iter().map(|e| e.duration).collect()
    }

    #[test]
    fn overnight_gap_is_discarded() {
        let (_dir, path) = ledger(&[
            "2024-01-14 22:00 +0530: Yesterday task",
            "2024-01-14 23:00 +0530: End of yesterday",
            "2024-01-15 09:00 +0530: Start of today",
            "2024-01-15 10:00 +0530: Working",
        ]);

        let journal = load(&path, at("2024-01-15 12:00 +0530")).unwrap();

        assert_eq!(
            durations(&journal),
            vec![
                Duration::zero(),
                Duration::hours(1),
                Duration::zero(),
                Duration::hours(1)
            ]
        );
        assert_eq!(journal.stats().daily.work, Duration::hours(1));
        assert_eq!(journal.stats().weekly.work, Duration::hours(1));
        assert_eq!(journal.stats().monthly.work, Duration::hours(2));
    }

    #[test]
    fn arrival_entry_starts_the_day() {
        let (_dir, path) = ledger(&[
            "2025-10-16 18:00 +0530: yesterday",
            "",
            "2025-10-17 09:41 +0530: **arrived",
            "2025-10-17 13:30 +0530: Task",
        ]);

        let journal = load(&path, at("2025-10-17 15:00 +0530")).unwrap();
        let stats = journal.stats();

        assert_eq!(journal.entries()[1].duration, Duration::zero());
        assert_eq!(stats.daily.slack, Duration::zero());
        assert_eq!(stats.daily.work, Duration::minutes(229));
        assert_eq!(stats.arrived_time, Some(at("2025-10-17 09:41 +0530")));
        assert!(journal.arrival_handled());
    }

    #[test]
    fn stops_at_first_malformed_line() {
        let (_dir, path) = ledger(&[
            "2025-10-17 09:00 +0530: one",
            "2025-10-17 10:00 +0530: two",
            "not-a-valid-line",
            "2025-10-17 11:00 +0530: four",
        ]);

        let partial = load(&path, at("2025-10-17 12:00 +0530")).unwrap_err();

        assert_eq!(partial.journal.entries().len(), 2);
        assert_eq!(partial.journal.stats().daily.work, Duration::hours(1));
        assert!(matches!(
            partial.error,
            JournalError::Parse {
                line: 3,
                source: ParseError::MissingFields { .. },
                ..
            }
        ));
    }

    #[test]
    fn blank_and_padded_lines() {
        let input = "\n  2025-10-17 09:00 +0530: one  \n\n\n2025-10-17 09:30 +0530: two\n";
        let journal = read_from(
            Cursor::new(input),
            Path::new("mem"),
            at("2025-10-17 12:00 +0530"),
        )
        .unwrap();

        assert_eq!(journal.entries().len(), 2);
        assert_eq!(journal.entries()[0].description, "one");
        assert_eq!(journal.entries()[1].duration, Duration::minutes(30));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let partial = load(&dir.path().join("nope.txt"), at("2025-10-17 12:00 +0530")).unwrap_err();

        assert!(partial.journal.entries().is_empty());
        assert!(matches!(partial.error, JournalError::Read { .. }));
    }

    #[test]
    fn append_writes_canonical_line() {
        let (_dir, path) = ledger(&["2025-10-17 09:00 +0530: one"]);
        let now = at("2025-10-17 12:00 +0530");
        let entry = Entry::new(at("2025-10-17 10:15 +0530"), "two: three", Duration::zero(), now);

        fs::write(&path, "2025-10-17 09:00 +0530: one\n").unwrap();
        append(&entry, false, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2025-10-17 09:00 +0530: one\n2025-10-17 10:15 +0530: two: three\n"
        );
    }

    #[test]
    fn arrival_separator_survives_reload() {
        let (_dir, path) = ledger(&["2025-10-16 17:00 +0530: yesterday\n"]);
        let now = at("2025-10-17 09:41 +0530");
        let before = load(&path, now).unwrap();

        let entry = Entry::new(now, "**arrived", Duration::zero(), now);
        append(&entry, true, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("\n\n2025-10-17 09:41 +0530: **arrived\n"));

        let after = load(&path, now).unwrap();
        assert_eq!(after.entries().len(), before.entries().len() + 1);
    }

    #[test]
    fn append_never_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let now = at("2025-10-17 12:00 +0530");
        let entry = Entry::new(now, "task", Duration::zero(), now);

        let err = append(&entry, false, &path).unwrap_err();
        assert!(matches!(err, JournalError::Append { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn record_matches_reload() {
        let (_dir, path) = ledger(&["2025-10-16 17:00 +0530: yesterday\n"]);
        let mut journal = load(&path, at("2025-10-17 09:41 +0530")).unwrap();

        journal
            .record("**arrived", at("2025-10-17 09:41 +0530"), &path)
            .unwrap();
        let task = journal
            .record("write parser", at("2025-10-17 11:11 +0530"), &path)
            .unwrap();
        assert_eq!(task.duration, Duration::minutes(90));

        let now = at("2025-10-17 11:11 +0530");
        let reloaded = load(&path, now).unwrap();
        assert_eq!(durations(&reloaded), durations(&journal));
        assert_eq!(reloaded.stats().daily, journal.stats().daily);
        assert_eq!(reloaded.stats().arrived_time, journal.stats().arrived_time);
    }

    #[test]
    fn record_drops_seconds_like_the_ledger() {
        let (_dir, path) = ledger(&[]);
        let arrival = at("2025-10-17 09:41 +0530");
        let mut journal = Journal::default();

        journal.record("**arrived", arrival, &path).unwrap();
        for hours in 1..=3 {
            let now = arrival + Duration::hours(hours) + Duration::seconds(50);
            let entry = journal.record("task", now, &path).unwrap();
            assert_eq!(entry.end_time, arrival + Duration::hours(hours));
        }

        let reloaded = load(&path, arrival + Duration::hours(4)).unwrap();
        assert_eq!(reloaded.stats().daily, journal.stats().daily);
        assert_eq!(journal.stats().daily.work, Duration::hours(3));
        assert_eq!(reloaded.entries(), journal.entries());
    }

    #[test]
    fn only_first_arrival_gets_a_separator() {
        let (_dir, path) = ledger(&[]);
        let mut journal = Journal::default();

        journal
            .record("**arrived", at("2025-10-17 09:00 +0530"), &path)
            .unwrap();
        journal
            .record("arrived**", at("2025-10-17 09:05 +0530"), &path)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\n2025-10-17 09:00 +0530: **arrived\n2025-10-17 09:05 +0530: arrived**\n"
        );
        assert_eq!(
            journal.stats().arrived_time,
            Some(at("2025-10-17 09:00 +0530"))
        );
    }

    #[test]
    fn failed_append_keeps_entry_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let mut journal = Journal::default();

        let err = journal
            .record("task", at("2025-10-17 09:00 +0530"), &path)
            .unwrap_err();

        assert!(matches!(err, JournalError::Append { .. }));
        assert_eq!(journal.entries().len(), 1);
    }

    #[test]
    fn record_rejects_multiline_description() {
        let (_dir, path) = ledger(&[]);
        let mut journal = Journal::default();

        let err = journal
            .record("one\ntwo", at("2025-10-17 09:00 +0530"), &path)
            .unwrap_err();
        assert!(matches!(err, JournalError::InvalidDescription(_)));
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn reload_keeps_state_on_failure() {
        let (_dir, path) = ledger(&["2025-10-17 09:00 +0530: one"]);
        let now = at("2025-10-17 12:00 +0530");
        let mut journal = load(&path, now).unwrap();

        fs::write(&path, "garbage\n").unwrap();
        assert!(journal.reload(&path, now).is_err());
        assert_eq!(journal.entries().len(), 1);

        fs::write(&path, "2025-10-17 09:00 +0530: one\n2025-10-17 09:10 +0530: two\n").unwrap();
        journal.reload(&path, now).unwrap();
        assert_eq!(journal.entries().len(), 2);
    }

    #[test]
    fn ensure_exists_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("timelog.txt");

        assert!(ensure_exists(&path).unwrap());
        fs::write(&path, "2025-10-17 09:00 +0530: one\n").unwrap();
        assert!(!ensure_exists(&path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2025-10-17 09:00 +0530: one\n"
        );
    }
}
