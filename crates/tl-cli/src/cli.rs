//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plain-text time journal.
///
/// Each line of the journal records when a task ended. Descriptions containing
/// `**` count as slack; `**arrived` marks the start of the working day.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference time instead of the clock (ISO 8601, journal format, or "2 hours ago").
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the journal file if it does not exist.
    Init,

    /// Record that a task just ended.
    Log {
        /// Project to prefix the description with (e.g. `acme:web:shop:backend`).
        #[arg(short, long)]
        project: Option<String>,

        /// Task description. Use `**arrived` when starting the day.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    /// Show today's, this week's and this month's totals.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List today's entries.
    Entries,

    /// Show status and refresh it whenever the journal changes.
    Watch,

    /// Show the project list as a tree.
    Projects,
}
