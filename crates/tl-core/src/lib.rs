//! Core engine of the `tl` time journal.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: parsing ledger lines and deriving durations
//! - Periods: classifying timestamps as today, this week or this month
//! - Stats: folding entries into work/slack totals
//! - Journal: loading and appending the ledger file
//! - Projects: parsing the project list into a tree
//!
//! Nothing here reads the system clock. Every operation that depends on the
//! current time takes it as a parameter.

pub mod entry;
pub mod journal;
pub mod period;
pub mod project;
pub mod stats;

pub use entry::{Entry, ParseError, TIME_LAYOUT, is_arrival_marker, is_slack, parse_line};
pub use journal::{Journal, JournalError, PartialLoad, append, ensure_exists, load};
pub use period::{Classification, classify};
pub use project::{NodeId, ProjectError, ProjectNode, ProjectTree, Row};
pub use stats::{Stats, StatsCollection};
