//! # UrlSense - Suspicious URL Classification Service
//!
//! Serves a pre-trained URL classifier over HTTP. The model artifact
//! (safetensors) is loaded exactly once at process start and shared read-only
//! across requests; each request is a single synchronous inference call with
//! no queue, cache, or worker pool in between.
//!
//! ## Endpoints
//!
//! | Method | Path              | Purpose                                    |
//! |--------|-------------------|--------------------------------------------|
//! | POST   | `/api/ml/predict` | Classify a URL, return label + confidences |
//! | GET    | `/api/ml/health`  | Liveness plus static model metadata        |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use urlsense::server::{self, AppState, ServerConfig};
//!
//! // Loads the model artifact; a load failure aborts startup.
//! let state = Arc::new(AppState::new(ServerConfig::default())?);
//! server::serve(state).await?;
//! ```
//!
//! Offline inference against the same artifact:
//!
//! ```rust,ignore
//! use urlsense::inference::{Classifier, NgramLinearModel};
//!
//! let model = NgramLinearModel::load("suspicious_url_model.safetensors")?;
//! let labels = model.predict(&["http://login-verify.example.ru"])?;
//! ```
//!
//! ## Modules
//!
//! - [`inference`]: classifier trait, native model, feature extraction
//! - [`server`]: HTTP API server (Axum-based)
//! - [`error`]: error types and result alias

pub mod error;
pub mod inference;
pub mod server;

// Re-exports for convenience
pub use error::{Result, UrlSenseError};
pub use inference::{Classifier, NgramLinearModel};
pub use server::{create_router, AppState, ServerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
