//! Feature validation and ordered vector assembly.
//!
//! [`assemble`] is a pure function of the raw record and the static schema:
//! it either produces the fixed-order vector the trained artifacts expect or
//! reports exactly why the record is unusable.

use thiserror::Error;

use crate::record::StudentRecord;
use crate::schema::{self, FEATURE_COUNT, FeatureDomain};

/// Fixed-order numeric feature vector, one value per schema position.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    /// Values in schema order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Why a raw record could not be turned into a feature vector.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// One or more required fields are absent. Lists every missing name.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields {
        /// All absent field names, in schema order.
        fields: Vec<String>,
    },
    /// A categorical field holds a value outside its enumerated domain.
    #[error("Invalid value for {field}: {value}; legal values: {allowed:?}")]
    OutOfDomain {
        /// Offending field name.
        field: &'static str,
        /// Supplied value.
        value: f64,
        /// Full set of legal codes.
        allowed: &'static [i64],
    },
    /// A continuous or discrete field lies outside its closed interval.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Supplied value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The record carries fields the schema knows nothing about.
    #[error("Unknown fields: {}", fields.join(", "))]
    UnknownFields {
        /// All unrecognized field names.
        fields: Vec<String>,
    },
}

/// Validate a raw record and assemble the ordered feature vector.
///
/// Checks run in a fixed sequence: presence of every required field (all
/// absences reported at once), then unknown keys, then per-field domain and
/// range checks in schema order. On success the vector holds the fields in
/// the exact order the scaler and classifier were fitted with.
pub fn assemble(record: &StudentRecord) -> Result<FeatureVector, ValidationError> {
    let missing: Vec<String> = schema::feature_names()
        .filter(|name| !record.contains(name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { fields: missing });
    }

    let unknown: Vec<String> = record
        .field_names()
        .filter(|name| schema::find(name).is_none() && !schema::is_aux_field(name))
        .map(str::to_string)
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownFields { fields: unknown });
    }

    let mut values = [0.0f32; FEATURE_COUNT];
    for (slot, spec) in values.iter_mut().zip(schema::FEATURES.iter()) {
        // Presence was checked above.
        let value = record.get(spec.name).unwrap_or_default();
        match spec.domain {
            FeatureDomain::Codes(allowed) => {
                if !spec.domain.contains(value) {
                    return Err(ValidationError::OutOfDomain {
                        field: spec.name,
                        value,
                        allowed,
                    });
                }
            }
            FeatureDomain::IntRange { min, max } => {
                if !spec.domain.contains(value) {
                    return Err(ValidationError::OutOfRange {
                        field: spec.name,
                        value,
                        min: min as f64,
                        max: max as f64,
                    });
                }
            }
            FeatureDomain::FloatRange { min, max } => {
                if !spec.domain.contains(value) {
                    return Err(ValidationError::OutOfRange {
                        field: spec.name,
                        value,
                        min,
                        max,
                    });
                }
            }
        }
        *slot = value as f32;
    }
    Ok(FeatureVector(values))
}
