//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{ReportArgs, SeriesArgs};

/// Ohada - SYSCOHADA aged-balance and provisioning reports
#[derive(Parser, Debug)]
#[command(name = "ohada-aging")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Extra configuration file, layered over config/default and config/{RUN_MODE}
    #[arg(short, long, global = true, env = "OHADA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the aging report for one as-of date
    Report(ReportArgs),

    /// Build one aging report per as-of date
    Series(SeriesArgs),

    /// Show the shipped regulatory presets
    Presets,
}
