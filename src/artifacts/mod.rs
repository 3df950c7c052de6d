//! Pre-trained model artifacts: loading, validation, and the catalog.
//!
//! Artifacts are serde_json documents produced offline when the model was
//! fitted. They are loaded once at process start, validated against the
//! feature schema, and never mutated afterwards.

use std::path::{Path, PathBuf};

use thiserror::Error;

mod classifier;
mod label_encoder;
mod scaler;

pub use classifier::{GbdtClassifier, Stump, softmax};
pub use label_encoder::LabelEncoder;
pub use scaler::StandardScaler;

/// Default file name for the fitted scaler.
pub const SCALER_FILE: &str = "scaler.json";
/// Default file name for the fitted classifier.
pub const CLASSIFIER_FILE: &str = "classifier.json";
/// Default file name for the label encoder.
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Errors that may occur while loading a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Failed to read the artifact file.
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        /// Artifact file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The artifact file is not valid JSON for the expected type.
    #[error("Invalid artifact JSON at {path}: {source}")]
    Parse {
        /// Artifact file path.
        path: PathBuf,
        /// JSON parse error.
        source: serde_json::Error,
    },
    /// The artifact parsed but is inconsistent with the feature schema.
    #[error("Artifact {path} failed validation: {reason}")]
    Invalid {
        /// Artifact file path.
        path: PathBuf,
        /// What the validation found.
        reason: String,
    },
}

/// Read and parse a JSON artifact file, then run its validation.
fn load_validated<T>(
    path: &Path,
    validate: impl Fn(&T) -> Result<(), String>,
) -> Result<T, ArtifactError>
where
    T: serde::de::DeserializeOwned,
{
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: T = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&artifact).map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(artifact)
}

/// All artifacts found in the artifact directory.
///
/// Loading is lenient: a missing or invalid artifact is logged and left
/// unavailable so inference can fail fast with a typed error instead of
/// crashing startup. Use [`ArtifactCatalog::load_strict`] when a hard
/// startup failure is preferred.
#[derive(Debug, Default)]
pub struct ArtifactCatalog {
    /// Fitted scaling transform, if it loaded cleanly.
    pub scaler: Option<StandardScaler>,
    /// Fitted classifier, if it loaded cleanly.
    pub classifier: Option<GbdtClassifier>,
    /// Label encoder, if present. Optional even under strict loading.
    pub label_encoder: Option<LabelEncoder>,
}

impl ArtifactCatalog {
    /// Load whatever artifacts are usable from `dir`, logging failures.
    pub fn load(dir: &Path) -> Self {
        let scaler = match StandardScaler::load_json(&dir.join(SCALER_FILE)) {
            Ok(scaler) => Some(scaler),
            Err(err) => {
                tracing::warn!("Scaler unavailable: {err}");
                None
            }
        };
        let classifier = match GbdtClassifier::load_json(&dir.join(CLASSIFIER_FILE)) {
            Ok(classifier) => Some(classifier),
            Err(err) => {
                tracing::warn!("Classifier unavailable: {err}");
                None
            }
        };
        let label_encoder = match LabelEncoder::load_json(&dir.join(LABEL_ENCODER_FILE)) {
            Ok(encoder) => Some(encoder),
            Err(err) => {
                tracing::debug!("Label encoder unavailable: {err}");
                None
            }
        };
        Self {
            scaler,
            classifier,
            label_encoder,
        }
    }

    /// Load artifacts from `dir`, failing on the first scaler or classifier
    /// problem. The label encoder stays best-effort.
    pub fn load_strict(dir: &Path) -> Result<Self, ArtifactError> {
        let scaler = StandardScaler::load_json(&dir.join(SCALER_FILE))?;
        let classifier = GbdtClassifier::load_json(&dir.join(CLASSIFIER_FILE))?;
        let label_encoder = LabelEncoder::load_json(&dir.join(LABEL_ENCODER_FILE)).ok();
        Ok(Self {
            scaler: Some(scaler),
            classifier: Some(classifier),
            label_encoder,
        })
    }
}
