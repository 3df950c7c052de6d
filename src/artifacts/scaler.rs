//! Pre-fitted standard scaling transform.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::preprocess::FeatureVector;
use crate::schema::{self, FEATURE_COUNT, SCHEMA_VERSION};

/// Per-feature linear transform fitted offline: `(x - mean) / scale`.
///
/// The fitted feature order must match the assembler's output order; that
/// is enforced at load time by comparing `feature_names` (and the optional
/// schema digest) against the static schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Feature vector layout version this scaler was fitted against.
    pub schema_version: u32,
    /// Optional SHA-256 of the ordered feature names at fit time.
    #[serde(default)]
    pub schema_sha256: Option<String>,
    /// Feature names in fitted order.
    pub feature_names: Vec<String>,
    /// Per-feature means.
    pub mean: Vec<f32>,
    /// Per-feature scale divisors.
    pub scale: Vec<f32>,
}

impl StandardScaler {
    /// Validate dimensions and schema compatibility.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(format!(
                "Unsupported schema_version {} (expected {SCHEMA_VERSION})",
                self.schema_version
            ));
        }
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "Scaler fitted on {} features, schema has {FEATURE_COUNT}",
                self.feature_names.len()
            ));
        }
        for (fitted, expected) in self.feature_names.iter().zip(schema::feature_names()) {
            if fitted != expected {
                return Err(format!(
                    "Fitted feature order diverges: found {fitted}, expected {expected}"
                ));
            }
        }
        if let Some(digest) = &self.schema_sha256 {
            let current = schema::fingerprint();
            if !digest.eq_ignore_ascii_case(&current) {
                return Err(format!(
                    "Schema digest mismatch: artifact {digest}, schema {current}"
                ));
            }
        }
        if self.mean.len() != FEATURE_COUNT {
            return Err("mean length must match the feature count".to_string());
        }
        if self.scale.len() != FEATURE_COUNT {
            return Err("scale length must match the feature count".to_string());
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err("mean contains a non-finite value".to_string());
        }
        if self.scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
            return Err("scale contains a zero or non-finite value".to_string());
        }
        Ok(())
    }

    /// Load and validate a scaler from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ArtifactError> {
        super::load_validated(path, Self::validate)
    }

    /// Apply the fitted transform elementwise.
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut scaled = vector.0;
        for (idx, value) in scaled.iter_mut().enumerate() {
            *value = (*value - self.mean[idx]) / self.scale[idx];
        }
        FeatureVector(scaled)
    }
}

/// Identity scaler matching the current schema, for tests and tooling.
#[cfg(test)]
pub fn identity() -> StandardScaler {
    StandardScaler {
        schema_version: SCHEMA_VERSION,
        schema_sha256: Some(schema::fingerprint()),
        feature_names: schema::feature_names().map(str::to_string).collect(),
        mean: vec![0.0; FEATURE_COUNT],
        scale: vec![1.0; FEATURE_COUNT],
    }
}
