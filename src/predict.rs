//! Scaling and inference adapter.
//!
//! [`Predictor`] is the explicit per-process context holding the loaded
//! artifacts. It is constructed once at startup and borrowed per request;
//! nothing in it mutates after construction.

use serde::Serialize;
use thiserror::Error;

use crate::artifacts::{ArtifactCatalog, GbdtClassifier, LabelEncoder, StandardScaler};
use crate::preprocess::{FeatureVector, ValidationError, assemble};
use crate::record::StudentRecord;

/// Binary dropout outcome. Class index 1 is the dropout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Predicted to continue enrollment.
    #[serde(rename = "No Dropout")]
    NoDropout,
    /// Predicted to discontinue enrollment.
    Dropout,
}

impl Outcome {
    fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::NoDropout),
            1 => Some(Self::Dropout),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDropout => write!(f, "No Dropout"),
            Self::Dropout => write!(f, "Dropout"),
        }
    }
}

/// Qualitative bucket derived from the maximum class probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceTier {
    /// Confidence above 0.8.
    High,
    /// Confidence above 0.6.
    Medium,
    /// Everything else.
    Low,
}

impl ConfidenceTier {
    /// Bucket a maximum class probability.
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > 0.8 {
            Self::High
        } else if confidence > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Per-class probabilities for the binary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    /// Probability of continued enrollment.
    pub no_dropout: f32,
    /// Probability of dropout.
    pub dropout: f32,
}

/// Result of one inference call.
///
/// Probability-derived fields are optional so classifiers without
/// probability estimation still produce the same result type.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Binary outcome.
    pub outcome: Outcome,
    /// Display label for the outcome.
    pub label: String,
    /// Per-class probabilities, when the classifier estimates them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
    /// Maximum class probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Qualitative confidence bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_tier: Option<ConfidenceTier>,
}

/// Errors surfaced by the prediction pipeline.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The raw record failed schema, domain, or range validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A required artifact never loaded; inference refuses to guess.
    #[error("Artifact unavailable: {artifact}")]
    ArtifactUnavailable {
        /// Which artifact is missing.
        artifact: &'static str,
    },
    /// The underlying computation produced an unusable result.
    #[error("Inference failed: {reason}")]
    Inference {
        /// What went wrong.
        reason: String,
    },
}

/// Classification seam between the adapter and the model artifact.
///
/// Lets tests substitute deterministic stubs for the trained model.
pub trait Classifier {
    /// Ordered class identifiers.
    fn classes(&self) -> &[String];
    /// Index of the predicted class for a scaled feature vector.
    fn predict_index(&self, features: &[f32]) -> usize;
    /// Class probabilities, when the model supports estimation.
    fn predict_proba(&self, features: &[f32]) -> Option<Vec<f32>>;
}

impl Classifier for GbdtClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_index(&self, features: &[f32]) -> usize {
        let raw = self.predict_raw(features);
        let mut best = 0usize;
        let mut best_val = f32::NEG_INFINITY;
        for (idx, &v) in raw.iter().enumerate() {
            if v > best_val {
                best_val = v;
                best = idx;
            }
        }
        best
    }

    fn predict_proba(&self, features: &[f32]) -> Option<Vec<f32>> {
        Some(GbdtClassifier::predict_proba(self, features))
    }
}

/// Loaded-artifact context for the scaling and inference pipeline.
pub struct Predictor {
    scaler: Option<StandardScaler>,
    classifier: Option<Box<dyn Classifier>>,
    label_encoder: Option<LabelEncoder>,
}

impl Predictor {
    /// Build a predictor from whatever the catalog managed to load.
    pub fn from_catalog(catalog: ArtifactCatalog) -> Self {
        Self {
            scaler: catalog.scaler,
            classifier: catalog
                .classifier
                .map(|model| Box::new(model) as Box<dyn Classifier>),
            label_encoder: catalog.label_encoder,
        }
    }

    /// Build a predictor from explicit parts. Test seam.
    pub fn with_parts(
        scaler: Option<StandardScaler>,
        classifier: Option<Box<dyn Classifier>>,
        label_encoder: Option<LabelEncoder>,
    ) -> Self {
        Self {
            scaler,
            classifier,
            label_encoder,
        }
    }

    /// Validate, assemble, scale, and classify one raw record.
    pub fn predict(&self, record: &StudentRecord) -> Result<Prediction, PredictError> {
        let vector = assemble(record)?;
        self.infer(&vector)
    }

    /// Scale and classify a pre-assembled feature vector.
    pub fn infer(&self, vector: &FeatureVector) -> Result<Prediction, PredictError> {
        let scaler = self
            .scaler
            .as_ref()
            .ok_or(PredictError::ArtifactUnavailable { artifact: "scaler" })?;
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(PredictError::ArtifactUnavailable {
                artifact: "classifier",
            })?;

        let scaled = scaler.transform(vector);
        let class_index = classifier.predict_index(scaled.as_slice());
        let outcome =
            Outcome::from_class_index(class_index).ok_or_else(|| PredictError::Inference {
                reason: format!("classifier returned class index {class_index} for a binary outcome"),
            })?;
        let label = self.display_label(classifier.as_ref(), class_index, outcome);

        let mut prediction = Prediction {
            outcome,
            label,
            probabilities: None,
            confidence: None,
            confidence_tier: None,
        };
        if let Some(proba) = classifier.predict_proba(scaled.as_slice()) {
            if proba.len() != 2 {
                return Err(PredictError::Inference {
                    reason: format!("expected 2 class probabilities, got {}", proba.len()),
                });
            }
            if proba.iter().any(|p| !p.is_finite()) {
                return Err(PredictError::Inference {
                    reason: "non-finite class probability".to_string(),
                });
            }
            let confidence = proba[0].max(proba[1]);
            prediction.probabilities = Some(ClassProbabilities {
                no_dropout: proba[0],
                dropout: proba[1],
            });
            prediction.confidence = Some(confidence);
            prediction.confidence_tier = Some(ConfidenceTier::from_confidence(confidence));
        }
        Ok(prediction)
    }

    fn display_label(
        &self,
        classifier: &dyn Classifier,
        class_index: usize,
        outcome: Outcome,
    ) -> String {
        if let Some(encoder) = &self.label_encoder {
            if let Some(label) = encoder.label_for(class_index) {
                return label.to_string();
            }
        }
        classifier
            .classes()
            .get(class_index)
            .cloned()
            .unwrap_or_else(|| outcome.to_string())
    }
}
