//! Series command implementation.
//!
//! Builds one report per as-of date, e.g. every month-end of a fiscal year.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use ohada_shared::{AppConfig, AppResult};
use tracing::{debug, info};

use super::{AgingOverrides, builder};
use crate::io::{print_json, read_items};

/// Arguments for the series command.
#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// JSON file holding an array of ledger items
    #[arg(short, long)]
    pub items: PathBuf,

    /// As-of dates (YYYY-MM-DD); reports keep this order
    #[arg(short, long, required = true, num_args = 1..)]
    pub as_of: Vec<NaiveDate>,

    #[command(flatten)]
    pub aging: AgingOverrides,
}

/// Executes the series command.
pub fn execute(args: &SeriesArgs, config: &AppConfig) -> AppResult<()> {
    let builder = builder(config, &args.aging)?;
    let items = read_items(&args.items)?;

    let reports = builder.build_series(&items, &args.as_of)?;
    for report in &reports {
        debug!(
            as_of = %report.as_of_date(),
            total_debt = %report.grand_total().total_debt,
            provision = %report.grand_total().provision,
            "Series report built"
        );
    }
    info!(reports = reports.len(), "Aging series built");

    print_json(&reports, config.output.pretty)
}
