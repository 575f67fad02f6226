//! UrlSense HTTP server.
//!
//! Exposes the loaded classifier over two routes:
//! - `POST /api/ml/predict` - classify a URL
//! - `GET /api/ml/health` - liveness plus static model metadata
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use urlsense::server::{self, AppState, ServerConfig};
//!
//! let state = Arc::new(AppState::new(ServerConfig::default())?);
//! server::serve(state).await?;
//! ```

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use handlers::{create_router, health, predict, HealthResponse, PredictResponse};
pub use state::AppState;

use crate::error::{Result, UrlSenseError};

/// Bind the configured address and serve requests until the process is
/// externally terminated.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.addr;
    let router = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| UrlSenseError::Server(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("listening on http://{addr}");

    axum::serve(listener, router)
        .await
        .map_err(|e| UrlSenseError::Server(format!("server error: {e}")))?;

    Ok(())
}
