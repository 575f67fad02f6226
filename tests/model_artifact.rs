//! Model artifact loading tests.
//!
//! Builds real safetensors artifacts on disk and drives them through the
//! same loader the service uses at startup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use safetensors::tensor::{Dtype, TensorView};
use urlsense::error::UrlSenseError;
use urlsense::inference::{Classifier, NgramLinearModel};
use urlsense::server::{AppState, ServerConfig};

const DIM: usize = 64;
const CLASSES: &str = "benign,defacement,malware,phishing";

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Serialize a small linear model. `num_classes` controls the tensor shapes;
/// the metadata labels can disagree with it to exercise validation.
fn artifact_bytes(
    num_classes: usize,
    classes_meta: Option<&str>,
    ngram_meta: Option<&str>,
) -> Vec<u8> {
    let weight: Vec<f32> = (0..num_classes * DIM)
        .map(|i| ((i * 31 + 7) % 13) as f32 / 13.0 - 0.5)
        .collect();
    let bias: Vec<f32> = (0..num_classes).map(|i| i as f32 * 0.05).collect();

    let weight_bytes = f32_bytes(&weight);
    let bias_bytes = f32_bytes(&bias);

    let views = vec![
        (
            "linear.weight",
            TensorView::new(Dtype::F32, vec![num_classes, DIM], &weight_bytes).unwrap(),
        ),
        (
            "linear.bias",
            TensorView::new(Dtype::F32, vec![num_classes], &bias_bytes).unwrap(),
        ),
    ];

    let mut meta = HashMap::new();
    if let Some(classes) = classes_meta {
        meta.insert("classes".to_string(), classes.to_string());
    }
    if let Some(ngram) = ngram_meta {
        meta.insert("ngram".to_string(), ngram.to_string());
    }

    safetensors::serialize(views, &Some(meta)).unwrap()
}

fn write_model(dir: &Path, bytes: &[u8]) -> PathBuf {
    let path = dir.join("suspicious_url_model.safetensors");
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_load_exposes_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("3")));

    let model = NgramLinearModel::load(&path).unwrap();
    assert_eq!(model.model_type(), "NgramLinearClassifier");
    assert_eq!(
        model.classes(),
        &["benign", "defacement", "malware", "phishing"]
    );
    assert_eq!(model.num_features(), DIM);
    assert_eq!(model.ngram(), 3);
}

#[test]
fn test_ngram_defaults_to_three() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), None));

    let model = NgramLinearModel::load(&path).unwrap();
    assert_eq!(model.ngram(), 3);
}

#[test]
fn test_prediction_is_a_known_class() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("3")));
    let model = NgramLinearModel::load(&path).unwrap();

    let labels = model.predict(&["http://login-verify.example.ru/account"]).unwrap();
    assert_eq!(labels.len(), 1);
    assert!(model.classes().contains(&labels[0]));
}

#[test]
fn test_probabilities_form_a_distribution() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("3")));
    let model = NgramLinearModel::load(&path).unwrap();

    let rows = model
        .predict_proba(&["https://example.com", "http://paypal.login.verify.ru"])
        .unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.len(), 4);
        assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
}

#[test]
fn test_inference_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("3")));
    let model = NgramLinearModel::load(&path).unwrap();

    let url = "https://example.com/login?next=/admin";
    let a = model.predict_proba(&[url]).unwrap();
    let b = model.predict_proba(&[url]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = NgramLinearModel::load(dir.path().join("nope.safetensors")).unwrap_err();
    assert!(matches!(err, UrlSenseError::ModelLoad(_)));
}

#[test]
fn test_corrupt_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), b"this is not a safetensors file");
    let err = NgramLinearModel::load(&path).unwrap_err();
    assert!(matches!(err, UrlSenseError::ModelLoad(_)));
}

#[test]
fn test_missing_class_labels_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, None, Some("3")));
    let err = NgramLinearModel::load(&path).unwrap_err();
    assert!(err.to_string().contains("classes"));
}

#[test]
fn test_duplicate_class_labels_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(2, Some("benign,benign"), None));
    let err = NgramLinearModel::load(&path).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_class_count_mismatch_fails() {
    let dir = tempfile::tempdir().unwrap();
    // 3 output rows, 4 labels.
    let path = write_model(dir.path(), &artifact_bytes(3, Some(CLASSES), None));
    let err = NgramLinearModel::load(&path).unwrap_err();
    assert!(matches!(err, UrlSenseError::ModelLoad(_)));
}

#[test]
fn test_invalid_ngram_fails() {
    let dir = tempfile::tempdir().unwrap();

    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("zero")));
    assert!(NgramLinearModel::load(&path).is_err());

    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("0")));
    assert!(NgramLinearModel::load(&path).is_err());
}

#[test]
fn test_app_state_loads_configured_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), &artifact_bytes(4, Some(CLASSES), Some("3")));

    let state = AppState::new(ServerConfig::default().with_model(&path)).unwrap();
    assert_eq!(state.model.model_type(), "NgramLinearClassifier");
    assert_eq!(state.model.classes().len(), 4);
}

#[test]
fn test_app_state_startup_fails_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::default().with_model(dir.path().join("missing.safetensors"));
    assert!(AppState::new(config).is_err());
}
