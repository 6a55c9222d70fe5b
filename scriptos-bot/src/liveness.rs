//! Minimal HTTP endpoint for uptime pingers, independent of the gateway connection.

use std::net::SocketAddr;

use anyhow::Context as _;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::info;

pub const ALIVE_MESSAGE: &str = "✅ Bot is alive!";

pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    ALIVE_MESSAGE
}

/// Bind `addr` and serve the liveness router until the process exits.
pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind liveness endpoint on {addr}"))?;

    info!(%addr, "liveness endpoint listening");

    axum::serve(listener, router())
        .await
        .context("liveness server error")?;

    Ok(())
}
