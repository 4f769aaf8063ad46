use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tl_cli::commands::{entries, init, log, projects, status, util, watch};
use tl_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    let now_arg = cli.now.as_deref();

    match &cli.command {
        Some(Commands::Init) => init::run(&mut stdout, &config)?,
        Some(Commands::Log {
            project,
            description,
        }) => {
            let now = util::resolve_now(now_arg)?;
            log::run(&mut stdout, &config, now, project.as_deref(), description)?;
        }
        Some(Commands::Status { json }) => {
            let now = util::resolve_now(now_arg)?;
            status::run(&mut stdout, &config, now, *json)?;
        }
        Some(Commands::Entries) => {
            let now = util::resolve_now(now_arg)?;
            entries::run(&mut stdout, &config, now)?;
        }
        Some(Commands::Watch) => watch::run(&mut stdout, &config, now_arg)?,
        Some(Commands::Projects) => projects::run(&mut stdout, &config)?,
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
