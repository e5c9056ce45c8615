//! Ohada aging CLI
//!
//! Builds SYSCOHADA aged-balance reports from a JSON ledger snapshot.

mod cli;
mod commands;
mod io;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ohada_shared::{AppConfig, AppError};

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let app_error = err.downcast_ref::<AppError>();
            let code = app_error.map_or("INTERNAL_ERROR", AppError::error_code);
            eprintln!("error [{code}]: {err:#}");
            ExitCode::from(app_error.map_or(70, AppError::exit_code))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load_with(cli.config.as_deref())
        .map_err(AppError::from)
        .context("failed to load configuration")?;
    if cli.pretty {
        config.output.pretty = true;
    }

    init_tracing(config.output.json_logs);

    match cli.command {
        Commands::Report(args) => commands::report::execute(&args, &config)?,
        Commands::Series(args) => commands::series::execute(&args, &config)?,
        Commands::Presets => commands::presets::execute(&config)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "ohada=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
