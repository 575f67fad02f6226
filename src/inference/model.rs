//! Native linear URL classifier loaded from safetensors.
//!
//! The model is a single dense layer over hashed character n-gram features:
//!
//! ```text
//! input URL → feature_vector [num_features]
//!           ↓
//! Linear(num_features, num_classes) + bias
//!           ↓
//! softmax → per-class probabilities
//! ```
//!
//! Weights are loaded once at process start and never mutated afterwards, so
//! the model is safe to share across concurrent requests without locking.

use std::collections::HashSet;
use std::path::Path;

use ndarray::{Array1, Array2};
use safetensors::SafeTensors;

use crate::error::{Result, UrlSenseError};

use super::features::feature_vector;

/// Narrow capability interface the service depends on.
///
/// Handlers are written against this trait rather than a concrete model, so
/// any classifier exposing batched predict/predict-probability operations and
/// an ordered class-label set is substitutable (including mocks in tests).
pub trait Classifier: Send + Sync {
    /// Implementation type name, surfaced by the health endpoint.
    fn model_type(&self) -> &str;

    /// Ordered class-label set the model can emit.
    fn classes(&self) -> &[String];

    /// Predict one label per input.
    fn predict(&self, inputs: &[&str]) -> Result<Vec<String>>;

    /// Predict one probability vector per input, positionally aligned with
    /// [`Classifier::classes`].
    fn predict_proba(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Hashed n-gram linear classifier.
#[derive(Debug, Clone)]
pub struct NgramLinearModel {
    classes: Vec<String>,
    ngram: usize,
    weight: Array2<f32>, // [num_classes, num_features]
    bias: Array1<f32>,   // [num_classes]
}

impl NgramLinearModel {
    /// Load the model from a safetensors artifact.
    ///
    /// Fails if the file is absent, unreadable, or structurally invalid; the
    /// caller treats any failure here as fatal at startup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let data = std::fs::read(path).map_err(|e| {
            UrlSenseError::ModelLoad(format!(
                "failed to read model file {}: {e}",
                path.display()
            ))
        })?;

        let (_, header) = SafeTensors::read_metadata(&data)
            .map_err(|e| UrlSenseError::ModelLoad(format!("failed to parse safetensors: {e}")))?;

        let meta = header.metadata().as_ref().ok_or_else(|| {
            UrlSenseError::ModelLoad("model file carries no metadata header".to_string())
        })?;

        let classes: Vec<String> = meta
            .get("classes")
            .ok_or_else(|| {
                UrlSenseError::ModelLoad("metadata is missing the \"classes\" key".to_string())
            })?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if classes.is_empty() {
            return Err(UrlSenseError::ModelLoad(
                "class label set is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for class in &classes {
            if !seen.insert(class.as_str()) {
                return Err(UrlSenseError::ModelLoad(format!(
                    "duplicate class label: {class}"
                )));
            }
        }

        let ngram = match meta.get("ngram") {
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                UrlSenseError::ModelLoad(format!("invalid ngram order {raw:?}: {e}"))
            })?,
            None => 3,
        };
        if ngram == 0 {
            return Err(UrlSenseError::ModelLoad(
                "ngram order must be at least 1".to_string(),
            ));
        }

        let tensors = SafeTensors::deserialize(&data)
            .map_err(|e| UrlSenseError::ModelLoad(format!("failed to parse safetensors: {e}")))?;

        let weight = load_tensor_2d(&tensors, "linear.weight")?;
        let bias = load_tensor_1d(&tensors, "linear.bias")?;

        if weight.shape()[0] != classes.len() || bias.len() != classes.len() {
            return Err(UrlSenseError::ModelLoad(format!(
                "weight shape {:?} / bias length {} do not match {} classes",
                weight.shape(),
                bias.len(),
                classes.len()
            )));
        }

        Ok(Self {
            classes,
            ngram,
            weight,
            bias,
        })
    }

    /// Number of hashed features the model expects.
    pub fn num_features(&self) -> usize {
        self.weight.shape()[1]
    }

    /// Character n-gram order used for feature extraction.
    pub fn ngram(&self) -> usize {
        self.ngram
    }

    /// Full forward pass for a single input.
    fn forward(&self, input: &str) -> Array1<f32> {
        let features = feature_vector(input, self.ngram, self.num_features());
        let logits = self.weight.dot(&features) + &self.bias;
        softmax(&logits)
    }
}

impl Classifier for NgramLinearModel {
    fn model_type(&self) -> &str {
        "NgramLinearClassifier"
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, inputs: &[&str]) -> Result<Vec<String>> {
        inputs
            .iter()
            .map(|input| {
                let probs = self.forward(input);
                let best = argmax(&probs).ok_or_else(|| {
                    UrlSenseError::Inference("empty probability vector".to_string())
                })?;
                Ok(self.classes[best].clone())
            })
            .collect()
    }

    fn predict_proba(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(inputs
            .iter()
            .map(|input| self.forward(input).to_vec())
            .collect())
    }
}

/// Softmax over array
fn softmax(x: &Array1<f32>) -> Array1<f32> {
    let max = x.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp = x.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index of the first maximum value, `None` for an empty array.
fn argmax(x: &Array1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in x.iter().enumerate() {
        match best {
            Some((_, p)) if v <= p => {},
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

// Helper functions for loading tensors

fn load_tensor_1d(tensors: &SafeTensors, name: &str) -> Result<Array1<f32>> {
    let view = tensors
        .tensor(name)
        .map_err(|e| UrlSenseError::ModelLoad(format!("tensor '{name}' not found: {e}")))?;

    if view.shape().len() != 1 {
        return Err(UrlSenseError::ModelLoad(format!(
            "expected 1D tensor for '{name}', got {:?}",
            view.shape()
        )));
    }

    let data: Vec<f32> = view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok(Array1::from_vec(data))
}

fn load_tensor_2d(tensors: &SafeTensors, name: &str) -> Result<Array2<f32>> {
    let view = tensors
        .tensor(name)
        .map_err(|e| UrlSenseError::ModelLoad(format!("tensor '{name}' not found: {e}")))?;

    let shape = view.shape();
    if shape.len() != 2 {
        return Err(UrlSenseError::ModelLoad(format!(
            "expected 2D tensor for '{name}', got {shape:?}"
        )));
    }

    let data: Vec<f32> = view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Array2::from_shape_vec((shape[0], shape[1]), data)
        .map_err(|e| UrlSenseError::ModelLoad(format!("shape mismatch for '{name}': {e}")))
}
