//! Configuration Tests
//!
//! Loading `salesquery.json` from disk and booting an engine from it.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;
use tokio::runtime::Runtime;

use salesquery::cli::{boot_engine, Config};
use salesquery::planner::{Dimension, FilterSet, QueryRequest};
use salesquery::schema::SaleRecord;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn write_dataset(dir: &TempDir) -> PathBuf {
    let date = NaiveDate::from_ymd_opt(2023, 2, 14).unwrap();
    let records = vec![
        SaleRecord::new(1, "T-1", date)
            .with_region("North")
            .with_amounts(Decimal::from(80), Decimal::from(72)),
        SaleRecord::new(2, "T-2", date)
            .with_region("South")
            .with_amounts(Decimal::from(40), Decimal::from(40)),
    ];
    write_json(dir, "sales.json", &serde_json::to_value(records).unwrap())
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_full_config_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_json(
        &dir,
        "salesquery.json",
        &json!({
            "dataset_path": "./data/sales.json",
            "http": {
                "host": "127.0.0.1",
                "port": 8081,
                "cors_origins": ["http://localhost:5173"]
            },
            "engine": { "snapshot_reads": true, "max_page_size": 200 },
            "logging": { "level": "debug" }
        }),
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.http.socket_addr(), "127.0.0.1:8081");
    assert_eq!(config.http.cors_origins, vec!["http://localhost:5173"]);
    assert!(config.engine.snapshot_reads);
    assert_eq!(config.engine.max_page_size, 200);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_needs_a_store() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "salesquery.json", &json!({ "logging": { "level": "info" } }));

    let err = Config::load(&path).unwrap_err();
    assert!(err.message().contains("dataset_path or database_url"));
}

#[test]
fn test_malformed_config_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("salesquery.json");
    fs::write(&path, "{ \"dataset_path\": ").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert_eq!(err.code_str(), "SALES_CLI_CONFIG_ERROR");
    assert!(err.message().contains("Invalid config JSON"));
}

// =============================================================================
// Boot Tests
// =============================================================================

#[test]
fn test_boot_from_config_file() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(&dir);
    let path = write_json(
        &dir,
        "salesquery.json",
        &json!({ "dataset_path": dataset.to_string_lossy() }),
    );

    let config = Config::load(&path).unwrap();
    let rt = Runtime::new().unwrap();
    let engine = boot_engine(&config, rt.handle()).unwrap();

    let request = QueryRequest::new()
        .with_filters(FilterSet::new().with_values(Dimension::Region, &["North"]));
    let result = engine.run(&request).unwrap();

    assert_eq!(result.total_count, 1);
    assert_eq!(result.total_final_amount, Decimal::from(72));
    assert_eq!(result.total_discount, Decimal::from(8));
}

#[test]
fn test_boot_rejects_malformed_dataset() {
    let dir = TempDir::new().unwrap();
    let dataset = write_json(&dir, "sales.json", &json!({"not": "an array"}));
    let path = write_json(
        &dir,
        "salesquery.json",
        &json!({ "dataset_path": dataset.to_string_lossy() }),
    );

    let config = Config::load(&path).unwrap();
    let rt = Runtime::new().unwrap();
    let err = boot_engine(&config, rt.handle()).unwrap_err();
    assert_eq!(err.code_str(), "SALES_CLI_DATASET_ERROR");
}
