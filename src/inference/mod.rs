//! URL classifier loading and inference.
//!
//! The service depends on the narrow [`Classifier`] capability interface
//! (predict a batch of strings, estimate per-class probabilities, expose the
//! ordered class-label set). [`NgramLinearModel`] is the concrete
//! implementation: a hashed character n-gram linear classifier loaded from a
//! safetensors artifact.
//!
//! # Artifact Layout
//!
//! ```text
//! linear.weight  [num_classes, num_features]  f32
//! linear.bias    [num_classes]                f32
//! metadata:
//!   classes  comma-separated ordered labels (required)
//!   ngram    character n-gram order (optional, default 3)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use urlsense::inference::{Classifier, NgramLinearModel};
//!
//! let model = NgramLinearModel::load("suspicious_url_model.safetensors")?;
//! let labels = model.predict(&["http://login-verify.example.ru/account"])?;
//! println!("{}", labels[0]);
//! ```

mod features;
mod model;

pub use features::feature_vector;
pub use model::{Classifier, NgramLinearModel};

/// Default model artifact filename, resolved relative to the executable.
pub const DEFAULT_MODEL_FILE: &str = "suspicious_url_model.safetensors";
