//! Gradient-boosted stump classifier fitted offline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::schema::{self, FEATURE_COUNT, SCHEMA_VERSION};

/// Single-split decision rule used as a weak learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stump {
    /// Feature vector position used for the split.
    pub feature_index: u16,
    /// Split threshold in scaled-feature units.
    pub threshold: f32,
    /// Contribution for `feature <= threshold`.
    pub left_value: f32,
    /// Contribution for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    /// Contribution of this stump for a scaled feature vector.
    pub fn response(&self, features: &[f32]) -> f32 {
        let value = features.get(self.feature_index as usize).copied().unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Pre-trained boosted-stump model for the binary dropout outcome.
///
/// Rounds of per-class stumps accumulate raw logits on top of `init_raw`;
/// softmax over the logits yields class probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtClassifier {
    /// Model format version.
    pub model_version: i64,
    /// Feature vector layout version this model was fitted against.
    pub schema_version: u32,
    /// Optional SHA-256 of the ordered feature names at fit time.
    #[serde(default)]
    pub schema_sha256: Option<String>,
    /// Number of values per feature vector.
    pub feature_len: usize,
    /// Ordered class identifiers; index 1 is the dropout class.
    pub classes: Vec<String>,
    /// Learning rate applied to each stump contribution.
    pub learning_rate: f32,
    /// Raw logits before any boosting round.
    pub init_raw: Vec<f32>,
    /// Shape: `[n_rounds][n_classes]`.
    pub stumps: Vec<Vec<Stump>>,
}

impl GbdtClassifier {
    /// Validate structural invariants and schema compatibility.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(format!(
                "Unsupported schema_version {} (expected {SCHEMA_VERSION})",
                self.schema_version
            ));
        }
        if self.feature_len != FEATURE_COUNT {
            return Err(format!(
                "Model fitted on {} features, schema has {FEATURE_COUNT}",
                self.feature_len
            ));
        }
        if let Some(digest) = &self.schema_sha256 {
            let current = schema::fingerprint();
            if !digest.eq_ignore_ascii_case(&current) {
                return Err(format!(
                    "Schema digest mismatch: artifact {digest}, schema {current}"
                ));
            }
        }
        if self.classes.len() != 2 {
            return Err(format!(
                "Dropout model must have exactly 2 classes, found {}",
                self.classes.len()
            ));
        }
        if self.init_raw.len() != self.classes.len() {
            return Err("init_raw length must match classes length".to_string());
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err("learning_rate must be a positive finite number".to_string());
        }
        for (round_idx, round) in self.stumps.iter().enumerate() {
            if round.len() != self.classes.len() {
                return Err(format!(
                    "Round {round_idx} has {} stumps but expected {}",
                    round.len(),
                    self.classes.len()
                ));
            }
            for stump in round {
                if stump.feature_index as usize >= self.feature_len {
                    return Err(format!(
                        "Round {round_idx} splits on feature {} beyond the vector length",
                        stump.feature_index
                    ));
                }
            }
        }
        Ok(())
    }

    /// Load and validate a classifier from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ArtifactError> {
        super::load_validated(path, Self::validate)
    }

    /// Accumulated raw logits for a scaled feature vector.
    pub fn predict_raw(&self, features: &[f32]) -> Vec<f32> {
        let mut raw = self.init_raw.clone();
        for round in &self.stumps {
            for (logit, stump) in raw.iter_mut().zip(round.iter()) {
                *logit += self.learning_rate * stump.response(features);
            }
        }
        raw
    }

    /// Class probabilities for a scaled feature vector.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        softmax(&self.predict_raw(features))
    }
}

/// Numerically-stable softmax over raw logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        // Degenerate logits; treat all classes as equally likely.
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class_model(rounds: Vec<Vec<Stump>>) -> GbdtClassifier {
        GbdtClassifier {
            model_version: 1,
            schema_version: SCHEMA_VERSION,
            schema_sha256: Some(schema::fingerprint()),
            feature_len: FEATURE_COUNT,
            classes: vec!["No Dropout".into(), "Dropout".into()],
            learning_rate: 1.0,
            init_raw: vec![0.0, 0.0],
            stumps: rounds,
        }
    }

    fn split_on_first_feature() -> Vec<Vec<Stump>> {
        vec![vec![
            Stump {
                feature_index: 0,
                threshold: 0.0,
                left_value: 2.0,
                right_value: -2.0,
            },
            Stump {
                feature_index: 0,
                threshold: 0.0,
                left_value: -2.0,
                right_value: 2.0,
            },
        ]]
    }

    #[test]
    fn stump_split_is_inclusive_on_the_left() {
        let stump = Stump {
            feature_index: 1,
            threshold: 0.5,
            left_value: -1.0,
            right_value: 1.0,
        };
        assert_eq!(stump.response(&[0.0, 0.5]), -1.0);
        assert_eq!(stump.response(&[0.0, 0.6]), 1.0);
    }

    #[test]
    fn probabilities_favor_the_boosted_class() {
        let model = two_class_model(split_on_first_feature());
        model.validate().unwrap();
        let mut low = [0.0f32; FEATURE_COUNT];
        low[0] = -1.0;
        let mut high = [0.0f32; FEATURE_COUNT];
        high[0] = 1.0;
        let proba_low = model.predict_proba(&low);
        let proba_high = model.predict_proba(&high);
        assert!(proba_low[0] > proba_low[1]);
        assert!(proba_high[1] > proba_high[0]);
        assert!((proba_low.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn validate_rejects_wrong_class_count() {
        let mut model = two_class_model(Vec::new());
        model.classes.push("Enrolled".into());
        model.init_raw.push(0.0);
        let err = model.validate().unwrap_err();
        assert!(err.contains("exactly 2 classes"));
    }

    #[test]
    fn validate_rejects_out_of_range_split_index() {
        let mut rounds = split_on_first_feature();
        rounds[0][0].feature_index = FEATURE_COUNT as u16;
        let model = two_class_model(rounds);
        let err = model.validate().unwrap_err();
        assert!(err.contains("beyond the vector length"));
    }

    #[test]
    fn validate_rejects_wrong_feature_len() {
        let mut model = two_class_model(Vec::new());
        model.feature_len = 10;
        assert!(model.validate().is_err());
    }

    #[test]
    fn softmax_handles_extreme_logits() {
        let proba = softmax(&[1000.0, -1000.0]);
        assert!((proba[0] - 1.0).abs() < 1e-6);
        assert!(proba[1] >= 0.0);
    }

    #[test]
    fn load_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        let model = two_class_model(split_on_first_feature());
        std::fs::write(&path, serde_json::to_vec(&model).unwrap()).unwrap();
        let loaded = GbdtClassifier::load_json(&path).unwrap();
        assert_eq!(loaded.classes, model.classes);
        assert_eq!(loaded.stumps.len(), 1);
    }
}
