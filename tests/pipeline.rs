//! End-to-end pipeline tests: artifacts on disk through to a prediction.

use std::path::Path;

use tempfile::tempdir;

use dropsight::artifacts::{
    ArtifactCatalog, CLASSIFIER_FILE, GbdtClassifier, LABEL_ENCODER_FILE, LabelEncoder,
    SCALER_FILE, StandardScaler, Stump,
};
use dropsight::predict::{ConfidenceTier, Outcome, PredictError, Predictor};
use dropsight::record::StudentRecord;
use dropsight::schema;

const TUITION_INDEX: u16 = 16; // Tuition_fees_up_to_date position in schema order

fn identity_scaler() -> StandardScaler {
    StandardScaler {
        schema_version: schema::SCHEMA_VERSION,
        schema_sha256: Some(schema::fingerprint()),
        feature_names: schema::feature_names().map(str::to_string).collect(),
        mean: vec![0.0; schema::FEATURE_COUNT],
        scale: vec![1.0; schema::FEATURE_COUNT],
    }
}

/// One boosting round splitting on tuition status: paid-up leans away from
/// dropout, overdue leans towards it.
fn tuition_classifier() -> GbdtClassifier {
    GbdtClassifier {
        model_version: 1,
        schema_version: schema::SCHEMA_VERSION,
        schema_sha256: Some(schema::fingerprint()),
        feature_len: schema::FEATURE_COUNT,
        classes: vec!["0".to_string(), "1".to_string()],
        learning_rate: 1.0,
        init_raw: vec![0.0, 0.0],
        stumps: vec![vec![
            Stump {
                feature_index: TUITION_INDEX,
                threshold: 0.5,
                left_value: -2.0,
                right_value: 2.0,
            },
            Stump {
                feature_index: TUITION_INDEX,
                threshold: 0.5,
                left_value: 2.0,
                right_value: -2.0,
            },
        ]],
    }
}

fn write_artifacts(dir: &Path) {
    let scaler = identity_scaler();
    let classifier = tuition_classifier();
    let encoder = LabelEncoder {
        classes: vec!["No Dropout".to_string(), "Dropout".to_string()],
    };
    std::fs::write(
        dir.join(SCALER_FILE),
        serde_json::to_vec_pretty(&scaler).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join(CLASSIFIER_FILE),
        serde_json::to_vec_pretty(&classifier).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join(LABEL_ENCODER_FILE),
        serde_json::to_vec_pretty(&encoder).unwrap(),
    )
    .unwrap();
}

#[test]
fn sample_record_predicts_no_dropout_with_high_confidence() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path());

    let catalog = ArtifactCatalog::load_strict(dir.path()).unwrap();
    let predictor = Predictor::from_catalog(catalog);
    let prediction = predictor.predict(&StudentRecord::sample()).unwrap();

    assert_eq!(prediction.outcome, Outcome::NoDropout);
    assert_eq!(prediction.label, "No Dropout");
    let proba = prediction.probabilities.unwrap();
    assert!((proba.no_dropout + proba.dropout - 1.0).abs() < 1e-6);
    assert!(proba.no_dropout > 0.9);
    assert_eq!(prediction.confidence, Some(proba.no_dropout));
    assert_eq!(prediction.confidence_tier, Some(ConfidenceTier::High));
}

#[test]
fn overdue_tuition_flips_the_outcome() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path());

    let predictor = Predictor::from_catalog(ArtifactCatalog::load(dir.path()));
    let mut record = StudentRecord::sample();
    record.set("Tuition_fees_up_to_date", 0.0);
    let prediction = predictor.predict(&record).unwrap();
    assert_eq!(prediction.outcome, Outcome::Dropout);
    assert_eq!(prediction.label, "Dropout");
}

#[test]
fn prediction_is_deterministic_across_calls() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path());

    let predictor = Predictor::from_catalog(ArtifactCatalog::load(dir.path()));
    let record = StudentRecord::sample();
    let first = predictor.predict(&record).unwrap();
    let second = predictor.predict(&record).unwrap();
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.confidence, second.confidence);
}

#[test]
fn corrupt_classifier_leaves_scaler_usable_but_inference_failing() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path());
    std::fs::write(dir.path().join(CLASSIFIER_FILE), b"{ truncated").unwrap();

    let catalog = ArtifactCatalog::load(dir.path());
    assert!(catalog.scaler.is_some());
    assert!(catalog.classifier.is_none());

    let predictor = Predictor::from_catalog(catalog);
    let err = predictor.predict(&StudentRecord::sample()).unwrap_err();
    assert!(matches!(
        err,
        PredictError::ArtifactUnavailable {
            artifact: "classifier"
        }
    ));
}

#[test]
fn scaler_fitted_on_different_schema_is_rejected_at_load() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path());

    let mut scaler = identity_scaler();
    scaler.feature_names.reverse();
    std::fs::write(
        dir.path().join(SCALER_FILE),
        serde_json::to_vec(&scaler).unwrap(),
    )
    .unwrap();

    let err = ArtifactCatalog::load_strict(dir.path()).unwrap_err();
    assert!(err.to_string().contains("order diverges"));
}

#[test]
fn validation_error_reaches_the_caller_before_any_inference() {
    let dir = tempdir().unwrap();
    // No artifacts on purpose: validation must fail first.
    let predictor = Predictor::from_catalog(ArtifactCatalog::load(dir.path()));
    let mut record = StudentRecord::sample();
    record.set("Course", 1234.0);
    let err = predictor.predict(&record).unwrap_err();
    assert!(matches!(err, PredictError::Validation(_)));
    assert!(err.to_string().contains("Course"));
}
