//! End-to-end tests for the `ohada-aging` binary.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Command isolated from the caller's configuration and environment.
fn ohada(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ohada-aging").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("OHADA_CONFIG")
        .env_remove("RUN_MODE")
        .env_remove("RUST_LOG")
        .env_remove("OHADA__AGING__PRESET")
        .env_remove("OHADA__AGING__KIND")
        .env_remove("OHADA__AGING__INCLUDE_ITEMS")
        .env_remove("OHADA__OUTPUT__PRETTY");
    cmd
}

fn write_items(dir: &TempDir, items: &Value) -> PathBuf {
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, serde_json::to_vec(items).unwrap()).unwrap();
    path
}

fn supplier_ledger() -> Value {
    json!([
        {
            "id": "INV-1",
            "counterpartyId": "FRN001",
            "counterpartyName": "Sodeci",
            "amount": 10_000_000,
            "dueDate": "2024-06-01",
            "currency": "XAF"
        },
        {
            "id": "INV-2",
            "counterpartyId": "FRN002",
            "counterpartyName": "Cie Ivoirienne",
            "amount": 300_000,
            "dueDate": "2024-10-01",
            "currency": "XAF"
        }
    ])
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_report_supplier_ledger() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    let report = stdout_json(
        ohada(&dir)
            .args(["report", "--as-of", "2024-09-16", "--items"])
            .arg(&items),
    );

    assert_eq!(report["kind"], "receivable");
    assert_eq!(report["currency"], "XAF");
    assert_eq!(report["asOfDate"], "2024-09-16");
    assert_eq!(report["ruleTable"]["name"], "SYSCOHADA_STANDARD");
    assert_eq!(report["rollups"][0]["counterpartyId"], "FRN001");
    assert_eq!(report["rollups"][0]["provision"], 5_000_000);
    assert_eq!(report["rollups"][1]["bucketTotals"]["NOT_DUE"], 300_000);
    assert_eq!(report["grandTotal"]["totalDebt"], 10_300_000);
    assert_eq!(report["grandTotal"]["overdueDebt"], 10_000_000);
    assert_eq!(report["grandTotal"]["provision"], 5_000_000);
    assert_eq!(report["grandTotal"]["netDebt"], 5_300_000);
    assert!(report["rollups"][0].get("items").is_none());
}

#[test]
fn test_report_detail_and_kind() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    let report = stdout_json(
        ohada(&dir)
            .args(["report", "--as-of", "2024-09-16", "--kind", "payable", "--detail"])
            .arg("--items")
            .arg(&items),
    );

    assert_eq!(report["kind"], "payable");
    let aged = &report["rollups"][0]["items"][0];
    assert_eq!(aged["id"], "INV-1");
    assert_eq!(aged["daysOverdue"], 107);
    assert_eq!(aged["bucket"], "DAYS_90_PLUS");
}

#[test]
fn test_report_with_art45_preset() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    let report = stdout_json(
        ohada(&dir)
            .args(["report", "--as-of", "2024-09-16", "--preset", "syscohada_art45"])
            .arg("--items")
            .arg(&items),
    );

    assert_eq!(report["ruleTable"]["name"], "SYSCOHADA_ART45");
    assert_eq!(report["bucketDefinition"][0]["label"], "MONTHS_0_6");
    // 107 days overdue sits in the first six months: no provision.
    assert_eq!(report["grandTotal"]["provision"], 0);
}

#[test]
fn test_report_pretty_output() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    ohada(&dir)
        .args(["--pretty", "report", "--as-of", "2024-09-16", "--items"])
        .arg(&items)
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"kind\": \"receivable\""));
}

#[test]
fn test_mixed_currency_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let mut ledger = supplier_ledger();
    ledger[1]["id"] = json!("EUR-1");
    ledger[1]["currency"] = json!("EUR");
    let items = write_items(&dir, &ledger);

    ohada(&dir)
        .args(["report", "--as-of", "2024-09-16", "--items"])
        .arg(&items)
        .assert()
        .code(65)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("VALIDATION_ERROR"))
        .stderr(predicate::str::contains("EUR-1"));
}

#[test]
fn test_negative_amount_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let mut ledger = supplier_ledger();
    ledger[0]["amount"] = json!(-5);
    let items = write_items(&dir, &ledger);

    ohada(&dir)
        .args(["report", "--as-of", "2024-09-16", "--items"])
        .arg(&items)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("INV-1"));
}

#[test]
fn test_missing_items_file_is_input_error() {
    let dir = TempDir::new().unwrap();

    ohada(&dir)
        .args(["report", "--as-of", "2024-09-16", "--items", "missing.json"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn test_unknown_preset_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    ohada(&dir)
        .args(["report", "--as-of", "2024-09-16", "--preset", "ifrs9", "--items"])
        .arg(&items)
        .assert()
        .code(78)
        .stderr(predicate::str::contains("CONFIGURATION_ERROR"))
        .stderr(predicate::str::contains("ifrs9"));
}

#[test]
fn test_invalid_as_of_date_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    ohada(&dir)
        .args(["report", "--as-of", "16/09/2024", "--items"])
        .arg(&items)
        .assert()
        .code(2);
}

#[test]
fn test_series_keeps_date_order() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());

    let reports = stdout_json(
        ohada(&dir)
            .args(["series", "--as-of", "2024-09-30", "2024-06-01", "2024-12-31"])
            .arg("--items")
            .arg(&items),
    );

    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["asOfDate"], "2024-09-30");
    assert_eq!(reports[1]["asOfDate"], "2024-06-01");
    assert_eq!(reports[2]["asOfDate"], "2024-12-31");
    // Nothing is overdue on its due date.
    assert_eq!(reports[1]["grandTotal"]["overdueDebt"], 0);
}

#[test]
fn test_presets_lists_both_regimes() {
    let dir = TempDir::new().unwrap();

    let presets = stdout_json(ohada(&dir).arg("presets"));

    let presets = presets.as_array().unwrap();
    assert_eq!(presets.len(), 2);
    assert_eq!(presets[0]["name"], "syscohada_standard");
    assert_eq!(presets[0]["configured"], true);
    assert_eq!(presets[0]["ruleTable"]["rates"]["DAYS_61_90"], "0.2");
    assert_eq!(presets[1]["name"], "syscohada_art45");
    assert_eq!(presets[1]["ruleTable"]["rates"]["MONTHS_12_PLUS"], "1");
    assert_eq!(presets[1]["monotonic"], true);
}

#[test]
fn test_config_file_defines_custom_buckets() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());
    std::fs::write(
        dir.path().join("aging.toml"),
        r#"
[aging]
kind = "payable"

[[aging.buckets]]
label = "EARLY"
min_days = 1
max_days = 100

[[aging.buckets]]
label = "LATE"
min_days = 100

[aging.rates]
LATE = "0.25"
"#,
    )
    .unwrap();

    let report = stdout_json(
        ohada(&dir)
            .args(["report", "--as-of", "2024-09-16", "--config", "aging.toml", "--items"])
            .arg(&items),
    );

    assert_eq!(report["kind"], "payable");
    assert_eq!(report["ruleTable"]["name"], "CUSTOM");
    assert_eq!(report["bucketDefinition"][1]["label"], "LATE");
    assert_eq!(report["grandTotal"]["bucketTotals"]["LATE"], 10_000_000);
    assert_eq!(report["grandTotal"]["provision"], 2_500_000);
}

#[test]
fn test_config_file_custom_buckets_without_rates_provision_nothing() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());
    std::fs::write(
        dir.path().join("aging.toml"),
        r#"
[[aging.buckets]]
label = "OVERDUE"
min_days = 1
"#,
    )
    .unwrap();

    let report = stdout_json(
        ohada(&dir)
            .args(["report", "--as-of", "2024-09-16", "--config", "aging.toml", "--items"])
            .arg(&items),
    );

    assert!(report["ruleTable"].get("name").is_none());
    assert_eq!(report["ruleTable"]["rates"], json!({}));
    assert_eq!(report["grandTotal"]["bucketTotals"]["OVERDUE"], 10_000_000);
    assert_eq!(report["grandTotal"]["provision"], 0);
}

#[test]
fn test_default_config_and_environment_layers() {
    let dir = TempDir::new().unwrap();
    let items = write_items(&dir, &supplier_ledger());
    std::fs::create_dir(dir.path().join("config")).unwrap();
    std::fs::write(
        dir.path().join("config/default.toml"),
        "[aging]\npreset = \"syscohada_art45\"\n",
    )
    .unwrap();

    let report = stdout_json(
        ohada(&dir)
            .env("OHADA__AGING__KIND", "payable")
            .args(["report", "--as-of", "2024-09-16", "--items"])
            .arg(&items),
    );

    assert_eq!(report["ruleTable"]["name"], "SYSCOHADA_ART45");
    assert_eq!(report["kind"], "payable");
}
