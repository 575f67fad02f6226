//! HTTP request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::error::{Result, UrlSenseError};
use crate::inference::Classifier;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let mut router = Router::new()
        .route("/api/ml/predict", post(predict))
        .route("/api/ml/health", get(health))
        .with_state(state);

    if cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(TraceLayer::new_for_http())
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Constant `"operational"` while the process is up.
    pub status: &'static str,
    /// The loaded model's implementation type name.
    pub model_type: String,
    /// Ordered class-label set the model can emit.
    pub classes: Vec<String>,
}

/// Health check endpoint.
///
/// Always returns 200: model loading is fatal at startup, so a running
/// process implies a loaded model.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "operational",
        model_type: state.model.model_type().to_string(),
        classes: state.model.classes().to_vec(),
    })
}

/// Prediction response
#[derive(Serialize)]
pub struct PredictResponse {
    /// The submitted URL, trimmed of surrounding whitespace.
    pub url: String,
    /// The predicted class label.
    pub prediction: String,
    /// Maximum class probability, rounded to 4 decimals.
    pub confidence: f64,
    /// Every class label mapped to its probability, rounded to 4 decimals.
    pub probabilities: BTreeMap<String, f64>,
}

/// Classify a URL using the loaded model.
///
/// The body is parsed by hand rather than through a typed extractor so that
/// a malformed body and a missing `url` field surface as the same 400 error,
/// matching the wire contract.
pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(url) = extract_url(&body) else {
        return error_response(StatusCode::BAD_REQUEST, &UrlSenseError::MissingField);
    };

    let url = url.trim();
    if url.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, &UrlSenseError::EmptyInput);
    }

    match run_inference(state.model.as_ref(), url) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

/// Pull the `url` string out of a JSON request body.
fn extract_url(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("url")?.as_str().map(ToOwned::to_owned)
}

/// Run the model on a single trimmed URL and assemble the response.
fn run_inference(model: &dyn Classifier, url: &str) -> Result<PredictResponse> {
    let batch = [url];

    let labels = model.predict(&batch)?;
    let rows = model.predict_proba(&batch)?;

    let prediction = labels
        .into_iter()
        .next()
        .ok_or_else(|| UrlSenseError::Inference("model returned no prediction".to_string()))?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| UrlSenseError::Inference("model returned no probabilities".to_string()))?;

    let classes = model.classes();
    if row.len() != classes.len() {
        return Err(UrlSenseError::Inference(format!(
            "probability vector has {} entries for {} classes",
            row.len(),
            classes.len()
        )));
    }

    let mut probabilities = BTreeMap::new();
    let mut max_prob = f32::NEG_INFINITY;
    for (label, &prob) in classes.iter().zip(&row) {
        if prob > max_prob {
            max_prob = prob;
        }
        probabilities.insert(label.clone(), round4(prob));
    }

    Ok(PredictResponse {
        url: url.to_string(),
        prediction,
        confidence: round4(max_prob),
        probabilities,
    })
}

/// Round a probability to 4 decimal places.
fn round4(p: f32) -> f64 {
    (f64::from(p) * 10_000.0).round() / 10_000.0
}

fn error_response(status: StatusCode, err: &UrlSenseError) -> Response {
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}
