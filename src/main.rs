//! autolot CLI - vehicle rental catalog
//!
//! Usage: autolot <COMMAND>
//!
//! Commands:
//!   summary        Record counts across the catalog
//!   manufacturer   Manage manufacturers
//!   vehicle-type   Manage vehicle types
//!   vehicle        Manage vehicles
//!   instance       Manage rentable vehicle instances

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use autolot::config::{Config, LogConfig, OutputFormat};
use autolot::presentation::{build_service, render, resolve_format, Cli, ErrorReport};
use autolot::CatalogError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, warnings) = Config::discover(cli.config.as_deref())?;
    init_tracing(&config.log, cli.verbose);
    for warning in &warnings {
        warn!("{}", warning);
    }
    if let Some(data_dir) = &cli.data_dir {
        config.store.data_dir = data_dir.clone();
    }

    let format = resolve_format(cli.json, config.output.format);
    let service = build_service(&config)?;

    let outcome = match cli.command.entity() {
        None => commands::cmd_summary(&service, format).await,
        Some((kind, action)) => commands::cmd_entity(&service, kind, action, format).await,
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<CatalogError>() {
            Some(catalog) => {
                report_failure(catalog, format);
                std::process::exit(catalog.exit_code());
            }
            None => Err(err),
        },
    }
}

/// `AUTOLOT_LOG` wins, then `-v`, then `log.level` from config.
fn init_tracing(log: &LogConfig, verbose: u8) {
    let level = match verbose {
        0 => log.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("AUTOLOT_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_failure(err: &CatalogError, format: OutputFormat) {
    match ErrorReport::from_error(err) {
        Some(report) => {
            let rendered = render(&report, format);
            match format {
                OutputFormat::Json => println!("{}", rendered),
                OutputFormat::Text => eprint!("{}", rendered),
            }
        }
        None => eprintln!("Error: {}", err),
    }
}
