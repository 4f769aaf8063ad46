//! CLI subcommand implementations.

pub mod entries;
pub mod init;
pub mod log;
pub mod projects;
pub mod status;
pub mod util;
pub mod watch;
