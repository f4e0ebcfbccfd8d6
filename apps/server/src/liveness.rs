//! Liveness endpoint for external uptime probes.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub const LIVENESS_BODY: &str = "Bot is running!";

/// Create the liveness router.
pub fn create_router() -> Router {
    Router::new().route("/", get(root_handler))
}

async fn root_handler() -> &'static str {
    LIVENESS_BODY
}

/// Bind `addr` and serve the liveness router on a background task.
///
/// Returns the bound address (useful when binding port 0) and the task handle.
pub async fn start_liveness_server(
    addr: &str,
) -> Result<(SocketAddr, JoinHandle<()>), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!("Liveness endpoint listening on http://{}", local_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, create_router()).await {
            error!("Liveness server error: {}", e);
        }
    });

    Ok((local_addr, handle))
}
