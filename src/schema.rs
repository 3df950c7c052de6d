//! Fixed feature schema shared by validation and the trained artifacts.
//!
//! The 22 entries in [`FEATURES`] define both the set of required input
//! fields and the positional order of the assembled feature vector. That
//! order is a contract with the pre-fitted scaler and classifier; changing
//! it silently corrupts predictions, which is why artifacts are checked
//! against [`fingerprint`] at load time.

use sha2::{Digest, Sha256};

/// Version of the feature vector layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of features fed to the model.
pub const FEATURE_COUNT: usize = 22;

/// Input fields carried for narrative output only, never fed to the model.
pub const AUX_FIELDS: [&str; 2] = ["GDP", "Unemployment_rate"];

/// Legal values for a single feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureDomain {
    /// Enumerated set of legal integer codes.
    Codes(&'static [i64]),
    /// Closed integer interval.
    IntRange { min: i64, max: i64 },
    /// Closed floating-point interval.
    FloatRange { min: f64, max: f64 },
}

impl FeatureDomain {
    /// Whether `value` is legal for this domain.
    ///
    /// Enumerated and integer-range domains require the value to be an
    /// exact integer; 1.5 is out of domain even if 1 and 2 are legal.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Self::Codes(codes) => {
                value.fract() == 0.0 && codes.contains(&(value as i64))
            }
            Self::IntRange { min, max } => {
                value.fract() == 0.0 && (*min..=*max).contains(&(value as i64))
            }
            Self::FloatRange { min, max } => (*min..=*max).contains(&value),
        }
    }
}

/// One named feature and its legal domain.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    /// Field name as it appears in the input record and artifact metadata.
    pub name: &'static str,
    /// Legal values for the field.
    pub domain: FeatureDomain,
}

const BINARY: FeatureDomain = FeatureDomain::Codes(&[0, 1]);
const GRADE: FeatureDomain = FeatureDomain::FloatRange {
    min: 95.0,
    max: 190.0,
};

/// All required features, in the exact order the artifacts were fitted with.
pub static FEATURES: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        name: "Marital_status",
        domain: FeatureDomain::Codes(&[1, 2, 3, 4, 5, 6]),
    },
    FeatureSpec {
        name: "Application_mode",
        domain: FeatureDomain::Codes(&[
            1, 2, 5, 7, 10, 15, 16, 17, 18, 26, 27, 39, 42, 43, 44, 51, 53, 57,
        ]),
    },
    FeatureSpec {
        name: "Application_order",
        domain: FeatureDomain::Codes(&[0, 1, 2, 3, 4, 5, 6, 9]),
    },
    FeatureSpec {
        name: "Course",
        domain: FeatureDomain::Codes(&[
            33, 171, 8014, 9003, 9070, 9085, 9119, 9130, 9147, 9238, 9254, 9500, 9556, 9670,
            9773, 9853, 9991,
        ]),
    },
    FeatureSpec {
        name: "Daytime_evening_attendance",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Previous_qualification",
        domain: FeatureDomain::Codes(&[
            1, 2, 3, 4, 5, 6, 9, 10, 12, 14, 15, 19, 38, 39, 40, 42, 43,
        ]),
    },
    FeatureSpec {
        name: "Previous_qualification_grade",
        domain: GRADE,
    },
    FeatureSpec {
        name: "Nacionality",
        domain: FeatureDomain::Codes(&[
            1, 2, 6, 11, 13, 14, 17, 21, 22, 24, 25, 26, 32, 41, 62, 100, 101, 103, 105, 108,
            109,
        ]),
    },
    FeatureSpec {
        name: "Mothers_qualification",
        domain: FeatureDomain::Codes(&[
            1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 14, 18, 19, 22, 26, 27, 29, 30, 34, 35, 36, 37,
            38, 39, 40, 41, 42, 43, 44,
        ]),
    },
    FeatureSpec {
        name: "Fathers_qualification",
        domain: FeatureDomain::Codes(&[
            1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 18, 19, 20, 22, 25, 26, 27, 29, 30, 31,
            33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44,
        ]),
    },
    FeatureSpec {
        name: "Mothers_occupation",
        domain: FeatureDomain::Codes(&[
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 90, 99, 122, 123, 125, 131, 132, 134, 141, 143,
            144, 151, 152, 153, 171, 173, 175, 191, 192, 193, 194,
        ]),
    },
    FeatureSpec {
        name: "Fathers_occupation",
        domain: FeatureDomain::Codes(&[
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 90, 99, 101, 102, 103, 112, 114, 121, 122, 123,
            124, 131, 132, 134, 135, 141, 143, 144, 151, 152, 153, 154, 161, 163, 171, 172,
            174, 175, 181, 182, 183, 192, 193, 194, 195,
        ]),
    },
    FeatureSpec {
        name: "Admission_grade",
        domain: GRADE,
    },
    FeatureSpec {
        name: "Displaced",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Educational_special_needs",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Debtor",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Tuition_fees_up_to_date",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Gender",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Scholarship_holder",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Age_at_enrollment",
        domain: FeatureDomain::IntRange { min: 17, max: 70 },
    },
    FeatureSpec {
        name: "International",
        domain: BINARY,
    },
    FeatureSpec {
        name: "Curricular_units_1st_sem_credited",
        domain: FeatureDomain::Codes(&[
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20,
        ]),
    },
];

/// Look up a feature spec by field name.
pub fn find(name: &str) -> Option<&'static FeatureSpec> {
    FEATURES.iter().find(|spec| spec.name == name)
}

/// Whether `name` is one of the narrative-only auxiliary fields.
pub fn is_aux_field(name: &str) -> bool {
    AUX_FIELDS.contains(&name)
}

/// Ordered feature names, one per vector position.
pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURES.iter().map(|spec| spec.name)
}

/// SHA-256 (lowercase hex) of the newline-joined ordered feature names.
///
/// Artifacts fitted against this schema may embed the same digest so that
/// an order or naming drift is caught at load time instead of silently
/// mispredicting.
pub fn fingerprint() -> String {
    let mut hasher = Sha256::new();
    for (idx, name) in feature_names().enumerate() {
        if idx > 0 {
            hasher.update(b"\n");
        }
        hasher.update(name.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
