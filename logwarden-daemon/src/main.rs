use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use logwarden_daemon::app;
use logwarden_daemon::cli::{Command, DaemonCli};
use logwarden_daemon::{logging, metrics_server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let config = app::load_config(&cli).await?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;

    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)?;
    }

    tracing::info!(role = ?cli.command, "logwarden-daemon starting");

    match cli.command {
        Command::Collect => {
            let listener = app::start_collector(&config.collector).await?;
            spawn_signal_handler(listener.shutdown_token());
            listener.run().await?;
        }
        Command::Serve => {
            let server = app::start_server(&config.server).await?;
            spawn_signal_handler(server.shutdown_token());
            server.run().await?;
        }
    }

    tracing::info!("logwarden-daemon shut down");
    Ok(())
}

/// Ctrl-C 수신 시 토큰을 취소합니다.
fn spawn_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        tracing::info!("shutdown signal received");
        token.cancel();
    });
}
