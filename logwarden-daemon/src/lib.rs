//! Logwarden daemon library.
//!
//! Exposes the daemon's building blocks for integration testing.
//! In production, `logwarden-daemon` is used as a binary (main.rs).

pub mod app;
pub mod cli;
pub mod logging;
pub mod metrics_server;
