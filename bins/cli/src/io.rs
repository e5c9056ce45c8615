//! Ledger input and JSON output.

use std::io::Write;
use std::path::Path;

use ohada_core::aging::LedgerItem;
use ohada_shared::{AppError, AppResult};
use serde::Serialize;
use tracing::info;

/// Reads a JSON array of ledger items.
pub fn read_items(path: &Path) -> AppResult<Vec<LedgerItem>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Input(format!("{}: {e}", path.display())))?;
    let items: Vec<LedgerItem> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Input(format!("{}: {e}", path.display())))?;

    info!(path = %path.display(), items = items.len(), "Loaded ledger items");
    Ok(items)
}

/// Writes `value` to stdout as one JSON document.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> AppResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").map_err(|e| AppError::Output(e.to_string()))
}
