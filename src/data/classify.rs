//! Classifier artifact loading and batch scoring.
//!
//! The pipeline treats the model as an opaque mapping from a feature row
//! to a `{0,1}` verdict. The artifact is a pretrained linear classifier
//! serialized as JSON: named feature columns, their weights, a bias term,
//! and the decision threshold. Feature selection and training happen
//! elsewhere; this module only deserializes and applies the result.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::{DeviceSnapshot, SnapshotBatch};

/// Errors from the classifier adapter.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact is missing or incompatible. Fatal at startup: the
    /// monitor cannot run without a classifier.
    #[error("failed to load model artifact: {0}")]
    Load(String),

    /// One record could not be scored. The record is dropped from the
    /// batch; other devices proceed.
    #[error("cannot score {device}: {reason}")]
    Inference { device: String, reason: String },
}

/// A loaded, pretrained anomaly classifier.
///
/// `classify` is pure and deterministic: the same model and batch always
/// produce the same predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    name: String,
    version: String,
    /// Feature columns, by telemetry field name, in weight order.
    features: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
    /// Probability cutoff: scores at or above it classify as anomalous.
    threshold: f64,
}

impl Model {
    /// Load the artifact from disk. Invoked once at process start.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;
        let model: Model = serde_json::from_str(&content)
            .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Check that the artifact is internally consistent and that every
    /// feature it names is one the telemetry channel can supply.
    fn validate(&self) -> Result<(), ModelError> {
        if self.features.is_empty() {
            return Err(ModelError::Load("artifact names no features".into()));
        }
        if self.features.len() != self.weights.len() {
            return Err(ModelError::Load(format!(
                "{} features but {} weights",
                self.features.len(),
                self.weights.len()
            )));
        }
        for feature in &self.features {
            if !is_known_feature(feature) {
                return Err(ModelError::Load(format!(
                    "unknown feature column {:?}",
                    feature
                )));
            }
        }
        if !self.threshold.is_finite() {
            return Err(ModelError::Load("non-finite decision threshold".into()));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Score every record in the batch, filling `prediction`.
    ///
    /// Records that cannot be scored (a missing or non-finite feature) are
    /// dropped from the returned batch and reported, so one bad record
    /// does not blank the dashboard for all assets. Input fields other
    /// than `prediction` are carried over untouched.
    pub fn classify(&self, batch: &SnapshotBatch) -> (SnapshotBatch, Vec<ModelError>) {
        let mut scored = Vec::with_capacity(batch.len());
        let mut errors = Vec::new();

        for record in batch.iter() {
            match self.predict(record) {
                Ok(prediction) => {
                    let mut record = record.clone();
                    // prediction is write-once: keep an existing verdict
                    if record.prediction.is_none() {
                        record.prediction = Some(prediction);
                    }
                    scored.push(record);
                }
                Err(e) => errors.push(e),
            }
        }

        (SnapshotBatch::from_records(scored), errors)
    }

    /// Score a single record: logistic regression over the artifact's
    /// feature columns.
    fn predict(&self, record: &DeviceSnapshot) -> Result<u8, ModelError> {
        let mut activation = self.bias;
        for (feature, weight) in self.features.iter().zip(&self.weights) {
            let value = feature_value(record, feature).ok_or_else(|| ModelError::Inference {
                device: record.device_name.clone(),
                reason: format!("missing feature {:?}", feature),
            })?;
            if !value.is_finite() {
                return Err(ModelError::Inference {
                    device: record.device_name.clone(),
                    reason: format!("non-finite value for feature {:?}", feature),
                });
            }
            activation += weight * value;
        }

        let score = sigmoid(activation);
        Ok(u8::from(score >= self.threshold))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Map an artifact feature column to the telemetry field that supplies it.
fn feature_value(record: &DeviceSnapshot, feature: &str) -> Option<f64> {
    match feature {
        "smooth_mag" | "magnitude" => Some(record.magnitude),
        "raw_freq" => record.raw_freq,
        "smooth_freq" => record.smooth_freq,
        "raw_mag" => record.raw_mag,
        _ => None,
    }
}

fn is_known_feature(feature: &str) -> bool {
    matches!(
        feature,
        "smooth_mag" | "magnitude" | "raw_freq" | "smooth_freq" | "raw_mag"
    )
}

/// Human-facing verdict derived from a binary prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Nominal,
    Danger,
}

impl AlertState {
    /// Map a prediction to a verdict.
    ///
    /// Only `1` means danger; `0` and any out-of-domain value fall through
    /// to nominal. The monitor loop flags out-of-domain values separately,
    /// since they indicate a classifier contract violation.
    pub fn from_prediction(prediction: u8) -> Self {
        if prediction == 1 {
            AlertState::Danger
        } else {
            AlertState::Nominal
        }
    }

    /// Display label for the status panel and diagnostic lines.
    pub fn label(&self) -> &'static str {
        match self {
            AlertState::Nominal => "NOMINAL",
            AlertState::Danger => "DANGER",
        }
    }

    pub fn is_danger(&self) -> bool {
        matches!(self, AlertState::Danger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// A model that flags magnitudes above roughly 2.0 Gs.
    fn test_model() -> Model {
        Model {
            name: "vibration-anomaly".to_string(),
            version: "1".to_string(),
            features: vec!["smooth_mag".to_string()],
            weights: vec![4.0],
            bias: -8.0,
            threshold: 0.5,
        }
    }

    fn batch(records: Vec<DeviceSnapshot>) -> SnapshotBatch {
        SnapshotBatch::from_records(records)
    }

    #[test]
    fn test_load_artifact() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "vibration-anomaly",
                "version": "1",
                "features": ["smooth_freq", "smooth_mag"],
                "weights": [0.01, 1.2],
                "bias": -6.5,
                "threshold": 0.5
            }}"#
        )
        .unwrap();
        file.flush().unwrap();

        let model = Model::load(file.path()).unwrap();
        assert_eq!(model.name(), "vibration-anomaly");
        assert_eq!(model.version(), "1");
    }

    #[test]
    fn test_load_missing_artifact_fails() {
        let err = Model::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ModelError::Load(_)));
    }

    #[test]
    fn test_load_rejects_weight_mismatch() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name":"m","version":"1","features":["smooth_mag"],"weights":[1.0,2.0],"bias":0.0,"threshold":0.5}}"#
        )
        .unwrap();
        file.flush().unwrap();
        assert!(matches!(Model::load(file.path()), Err(ModelError::Load(_))));
    }

    #[test]
    fn test_load_rejects_unknown_feature() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name":"m","version":"1","features":["temperature"],"weights":[1.0],"bias":0.0,"threshold":0.5}}"#
        )
        .unwrap();
        file.flush().unwrap();
        let err = Model::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_classify_fills_predictions() {
        let model = test_model();
        let input = batch(vec![
            DeviceSnapshot::new("Main_Motor_A", 0.42),
            DeviceSnapshot::new("Cooling_Fan_01", 5.72),
        ]);

        let (scored, errors) = model.classify(&input);
        assert!(errors.is_empty());
        assert_eq!(scored.get("Main_Motor_A").unwrap().prediction, Some(0));
        assert_eq!(scored.get("Cooling_Fan_01").unwrap().prediction, Some(1));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let model = test_model();
        let input = batch(vec![
            DeviceSnapshot::new("Main_Motor_A", 1.9),
            DeviceSnapshot::new("Main_Motor_B", 2.1),
        ]);

        let (first, _) = model.classify(&input);
        let (second, _) = model.classify(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_does_not_mutate_other_fields() {
        let model = test_model();
        let mut record = DeviceSnapshot::new("Main_Motor_A", 0.42);
        record.smooth_freq = Some(118.2);
        let input = batch(vec![record.clone()]);

        let (scored, _) = model.classify(&input);
        let out = scored.get("Main_Motor_A").unwrap();
        assert_eq!(out.magnitude, record.magnitude);
        assert_eq!(out.smooth_freq, record.smooth_freq);
    }

    #[test]
    fn test_unscorable_record_is_dropped_not_fatal() {
        let model = Model {
            features: vec!["smooth_freq".to_string()],
            weights: vec![1.0],
            ..test_model()
        };

        let mut with_freq = DeviceSnapshot::new("Main_Motor_A", 0.42);
        with_freq.smooth_freq = Some(118.2);
        let without_freq = DeviceSnapshot::new("Cooling_Fan_01", 5.72);
        let input = batch(vec![with_freq, without_freq]);

        let (scored, errors) = model.classify(&input);
        assert_eq!(scored.len(), 1);
        assert!(scored.get("Main_Motor_A").is_some());
        assert!(scored.get("Cooling_Fan_01").is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Cooling_Fan_01"));
    }

    #[test]
    fn test_nan_magnitude_is_inference_error() {
        let model = test_model();
        let input = batch(vec![DeviceSnapshot::new("Main_Motor_A", f64::NAN)]);
        let (scored, errors) = model.classify(&input);
        assert!(scored.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_alert_state_mapping() {
        assert_eq!(AlertState::from_prediction(1), AlertState::Danger);
        assert_eq!(AlertState::from_prediction(0), AlertState::Nominal);
        // Out-of-domain values fall through to nominal
        assert_eq!(AlertState::from_prediction(7), AlertState::Nominal);
        assert_eq!(AlertState::Danger.label(), "DANGER");
        assert_eq!(AlertState::Nominal.label(), "NOMINAL");
    }
}
