//! salesquery CLI entry point
//!
//! main.rs only parses, dispatches and reports. Configuration, logging and
//! dataset loading all live in the CLI module.

use salesquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
