//! lxns - Linux namespace tool
//!
//! Single-threaded on purpose: the kernel refuses to move a multithreaded
//! process into a user namespace.

use std::process;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // RUST_LOG wins over --verbose; stdout is left for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::dispatch(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
