//! Shared server state.

use std::sync::Arc;

use super::config::ServerConfig;
use crate::error::Result;
use crate::inference::{Classifier, NgramLinearModel};

/// Application state shared across handlers.
///
/// The model is loaded exactly once here and never replaced or mutated
/// afterwards, so it is shared across concurrent requests without locking.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The loaded classifier
    pub model: Arc<dyn Classifier>,
}

impl AppState {
    /// Create application state, loading the model artifact.
    ///
    /// A load failure here must abort startup: the service never becomes
    /// ready without a model.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let path = config.resolved_model_path();
        let model = NgramLinearModel::load(&path)?;

        tracing::info!(
            "ML model loaded: {} ({} classes: {:?})",
            model.model_type(),
            model.classes().len(),
            model.classes()
        );

        Ok(Self {
            config,
            model: Arc::new(model),
        })
    }

    /// Create application state around an already-constructed classifier.
    ///
    /// Used by tests and embedders that supply their own [`Classifier`].
    pub fn with_classifier(config: ServerConfig, model: Arc<dyn Classifier>) -> Self {
        Self { config, model }
    }
}
