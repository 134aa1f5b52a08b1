//! CLI argument definitions for logwarden-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Logwarden log ingestion daemon.
///
/// Runs either the stream collector or the storage/query server.
/// Both roles read the same `logwarden.toml`.
#[derive(Parser, Debug)]
#[command(name = "logwarden-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to logwarden.toml configuration file.
    ///
    /// When omitted, built-in defaults plus `LOGWARDEN_*` environment
    /// variables are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without starting.
    #[arg(long)]
    pub validate: bool,

    /// Role to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Daemon role.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Accept newline-delimited JSON events over TCP, enrich and forward them.
    Collect,
    /// Serve the ingest/query HTTP API backed by the JSON Lines store.
    Serve,
}
