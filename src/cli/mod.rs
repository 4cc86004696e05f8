//! CLI module for salesquery
//!
//! Provides command-line interface for:
//! - serve: Open the dataset and serve the HTTP API
//! - query: One-shot query execution
//! - explain: One-shot explain execution

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot_engine, explain, query, run, run_command, serve};
pub use config::{Config, LoggingConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
