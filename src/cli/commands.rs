//! CLI command implementations
//!
//! Boot sequence shared by `serve` and `query`:
//! 1. Configuration load
//! 2. Logging setup
//! 3. Store open: PostgreSQL when `database_url` is set, else the
//!    JSON dataset
//! 4. Engine construction
//!
//! `explain` stops after step 2: it never opens a store.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::{Handle, Runtime};
use tracing::info;

use crate::engine::{ExplainPlan, QueryEngine};
use crate::observability::{self, Event};
use crate::rest_api::{RestError, SalesQueryParams, SalesResponse};
use crate::storage::{MemoryStore, PgStore, SalesStore};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Query { config } => query(&config),
        Command::Explain { config } => explain(&config),
    }
}

/// Start the HTTP API server and serve until the process is stopped
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let rt = new_runtime()?;
    let engine = boot_engine(&config, rt.handle())?;

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }

    use crate::http_server::HttpServer;

    let server = HttpServer::new(engine, http_config);

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Execute a single query and exit
///
/// Reads the query parameters as one JSON object from stdin and writes
/// the sales response (or an error object) to stdout.
pub fn query(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let rt = new_runtime()?;
    let engine = boot_engine(&config, rt.handle())?;

    let params: SalesQueryParams = serde_json::from_value(read_request()?)?;

    let outcome = params
        .validate(config.engine.max_page_size)
        .and_then(|request| engine.run(&request).map_err(RestError::from));

    match outcome {
        Ok(result) => write_response(serde_json::to_value(SalesResponse::from(result))?),
        Err(err) => {
            write_error(err.code(), &err.to_string())?;
            Err(CliError::query_failed(err.to_string()))
        }
    }
}

/// Execute explain on a single query and exit
pub fn explain(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    let params: SalesQueryParams = serde_json::from_value(read_request()?)?;

    match params.validate(config.engine.max_page_size) {
        Ok(request) => write_text(&ExplainPlan::for_request(&request).to_string()),
        Err(RestError::Rejected(err)) => write_text(&ExplainPlan::from_error(&err).to_string()),
        Err(err) => {
            write_error(err.code(), &err.to_string())?;
            Err(CliError::query_failed(err.to_string()))
        }
    }
}

/// Loads config and brings up logging.
fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;

    observability::init_logging(&config.logging.level)
        .map_err(|e| CliError::boot_failed(e.to_string()))?;

    info!(event = %Event::BootStart, "salesquery starting");
    info!(
        event = %Event::ConfigLoaded,
        path = %config_path.display(),
        snapshot_reads = config.engine.snapshot_reads,
        max_page_size = config.engine.max_page_size,
        "configuration loaded"
    );

    Ok(config)
}

fn new_runtime() -> CliResult<Runtime> {
    Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Opens the configured store and builds the engine over it.
///
/// `runtime` drives the PostgreSQL pool. Must be called outside any async
/// context.
pub fn boot_engine(config: &Config, runtime: &Handle) -> CliResult<QueryEngine> {
    let store: Arc<dyn SalesStore> = match config.database_url() {
        Some(url) => {
            let store = runtime
                .block_on(PgStore::connect(url, runtime.clone()))
                .map_err(|e| CliError::dataset_error(e.to_string()))?;
            log_store_opened("postgres", &store)?;
            Arc::new(store)
        }
        None => {
            let store = open_store(config.dataset_path())?;
            log_store_opened(&config.dataset_path().display().to_string(), &store)?;
            Arc::new(store)
        }
    };

    Ok(QueryEngine::new(store, config.engine.clone()))
}

fn log_store_opened(source: &str, store: &dyn SalesStore) -> CliResult<()> {
    info!(
        event = %Event::DatasetLoaded,
        source = %source,
        records = store.len().map_err(|e| CliError::dataset_error(e.to_string()))?,
        "dataset loaded"
    );
    Ok(())
}

fn open_store(path: &Path) -> CliResult<MemoryStore> {
    MemoryStore::open(path).map_err(|e| CliError::dataset_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::QueryRequest;
    use crate::schema::SaleRecord;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir) -> String {
        let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        let records = vec![
            SaleRecord::new(1, "T-1", date).with_region("East"),
            SaleRecord::new(2, "T-2", date).with_region("West"),
        ];
        let path = dir.path().join("sales.json");
        fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
        path.to_string_lossy().to_string()
    }

    fn config_for(dataset_path: String) -> Config {
        serde_json::from_value(json!({ "dataset_path": dataset_path })).unwrap()
    }

    fn boot(config: &Config) -> CliResult<QueryEngine> {
        let rt = Runtime::new().unwrap();
        boot_engine(config, rt.handle())
    }

    #[test]
    fn test_boot_engine_opens_dataset() {
        let dir = TempDir::new().unwrap();
        let config = config_for(write_dataset(&dir));

        let engine = boot(&config).unwrap();
        assert_eq!(engine.store().len().unwrap(), 2);

        let result = engine.run(&QueryRequest::new()).unwrap();
        assert_eq!(result.total_count, 2);
    }

    #[test]
    fn test_boot_engine_missing_dataset() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json").to_string_lossy().to_string();

        let err = boot(&config_for(missing)).unwrap_err();
        assert_eq!(err.code_str(), "SALES_CLI_DATASET_ERROR");
    }

    #[test]
    fn test_boot_engine_rejects_duplicate_transactions() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        let records = vec![
            SaleRecord::new(1, "T-1", date),
            SaleRecord::new(2, "T-1", date),
        ];
        let path = dir.path().join("dupes.json");
        fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let err = boot(&config_for(path.to_string_lossy().to_string())).unwrap_err();
        assert!(err.message().contains("T-1"));
    }

    #[test]
    fn test_boot_engine_prefers_database_url() {
        let dir = TempDir::new().unwrap();
        let config: Config = serde_json::from_value(json!({
            "dataset_path": write_dataset(&dir),
            "database_url": "not a database url"
        }))
        .unwrap();

        // the valid dataset is ignored once a database is configured
        let err = boot(&config).unwrap_err();
        assert_eq!(err.code_str(), "SALES_CLI_DATASET_ERROR");
        assert!(err.message().contains("SALES_STORAGE_UNAVAILABLE"));
    }
}
