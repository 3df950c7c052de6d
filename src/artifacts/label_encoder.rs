//! Label encoder mapping class indices to display labels.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// Class index to label mapping saved alongside the classifier.
///
/// Optional at runtime; when absent the predictor falls back to the
/// classifier's own class identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Labels in class-index order.
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Validate that the mapping is non-empty and unambiguous.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("No classes defined".to_string());
        }
        let mut seen = self.classes.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.classes.len() {
            return Err("Duplicate class labels".to_string());
        }
        Ok(())
    }

    /// Load and validate a label encoder from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ArtifactError> {
        super::load_validated(path, Self::validate)
    }

    /// Label for a class index, if one is defined.
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}
