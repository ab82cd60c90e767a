use std::process;

use clap::Parser;
use ssai_cli::{
    cli::{Args, Commands},
    config::AppConfig,
    error::Result,
    output::OutputManager,
    replay::replay,
    script::SessionScript,
};
use tracing::{Level, error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("Application error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet)?;

    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::Replay {
            script,
            output,
            no_snapback,
        } => {
            let session = SessionScript::from_path(&script)?;
            let mut manager_config = config.manager.clone();
            if no_snapback {
                manager_config = manager_config.with_snapback(false);
            }

            let report = replay(&session, manager_config)?;
            info!(
                "Replay finished: {} ads started, {} unrecovered errors",
                report.stats.started, report.stats.unrecovered_errors
            );

            let format = output.unwrap_or(config.output);
            println!("{}", OutputManager::new(format).format_report(&report)?);
        }
        Commands::Config { show } => {
            if show {
                println!("{}", config.show()?);
            } else if let Some(path) = AppConfig::default_path() {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so JSON reports on stdout stay machine readable.
fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .init();
    Ok(())
}
