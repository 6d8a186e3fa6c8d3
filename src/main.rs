use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thesis_gateway::config::Args;
use thesis_gateway::state::AppState;
use thesis_gateway::{handlers, logging, rate_limit};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();
    let log_format = logging::configure_logging()?;
    tracing::debug!(?log_format, "logging configured");

    let state = Arc::new(AppState::from_args(&args).context("failed to build HTTP client")?);

    // evict idle rate windows in the background
    tokio::spawn(rate_limit::sweeper(
        state.rate_limiter.clone(),
        Duration::from_secs(args.sweep_interval.max(1)),
    ));

    let app = handlers::router(state.clone());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, "thesis gateway listening");
    tracing::info!(
        rate_limit = args.rate_limit,
        rate_window_secs = args.rate_window,
        request_timeout_secs = args.request_timeout,
        api_configured = state.api_configured(),
        "limits"
    );

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
