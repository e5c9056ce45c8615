//! Report command implementation.
//!
//! Builds the aging report for a single as-of date.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use ohada_shared::{AppConfig, AppResult};
use tracing::info;

use super::{AgingOverrides, builder};
use crate::io::{print_json, read_items};

/// Arguments for the report command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSON file holding an array of ledger items
    #[arg(short, long)]
    pub items: PathBuf,

    /// As-of date (YYYY-MM-DD)
    #[arg(short, long)]
    pub as_of: NaiveDate,

    #[command(flatten)]
    pub aging: AgingOverrides,
}

/// Executes the report command.
pub fn execute(args: &ReportArgs, config: &AppConfig) -> AppResult<()> {
    let builder = builder(config, &args.aging)?;
    let items = read_items(&args.items)?;

    let report = builder.build(&items, args.as_of)?;
    let totals = report.grand_total();
    info!(
        as_of = %report.as_of_date(),
        kind = %report.kind(),
        counterparties = totals.counterparty_count,
        total_debt = %totals.total_debt,
        provision = %totals.provision,
        "Aging report built"
    );

    print_json(&report, config.output.pretty)
}
