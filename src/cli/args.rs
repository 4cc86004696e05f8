//! CLI argument definitions using clap
//!
//! Commands:
//! - salesquery serve --config <path> [--port <port>]
//! - salesquery query --config <path>
//! - salesquery explain --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// salesquery - paginated, filtered sales queries with totals
#[derive(Parser, Debug)]
#[command(name = "salesquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./salesquery.json")]
        config: PathBuf,

        /// Port to listen on, overriding the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one query read as JSON from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./salesquery.json")]
        config: PathBuf,
    },

    /// Explain one query read as JSON from stdin and exit
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./salesquery.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
