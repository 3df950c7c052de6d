//! Raw input record collected from the caller before validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named raw inputs for one student, as collected by the front end.
///
/// Values are plain numbers keyed by field name; nothing is validated at
/// this stage. Deserializes directly from a JSON object of numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentRecord {
    fields: BTreeMap<String, f64>,
}

impl StudentRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a raw field value by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Set a raw field value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Whether the record contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over all field names present in the record.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// GDP auxiliary field, if supplied.
    pub fn gdp(&self) -> Option<f64> {
        self.get("GDP")
    }

    /// Unemployment rate auxiliary field, if supplied.
    pub fn unemployment_rate(&self) -> Option<f64> {
        self.get("Unemployment_rate")
    }

    /// Documented sample record with a legal value for every field.
    ///
    /// Used by tests and by the CLI `--sample` flag.
    pub fn sample() -> Self {
        let mut record = Self::new();
        record
            .set("Marital_status", 1.0)
            .set("Application_mode", 17.0)
            .set("Application_order", 1.0)
            .set("Course", 9254.0)
            .set("Daytime_evening_attendance", 1.0)
            .set("Previous_qualification", 1.0)
            .set("Previous_qualification_grade", 120.0)
            .set("Nacionality", 1.0)
            .set("Mothers_qualification", 19.0)
            .set("Fathers_qualification", 12.0)
            .set("Mothers_occupation", 5.0)
            .set("Fathers_occupation", 9.0)
            .set("Admission_grade", 125.0)
            .set("Displaced", 0.0)
            .set("Educational_special_needs", 0.0)
            .set("Debtor", 0.0)
            .set("Tuition_fees_up_to_date", 1.0)
            .set("Gender", 1.0)
            .set("Scholarship_holder", 0.0)
            .set("Age_at_enrollment", 20.0)
            .set("International", 0.0)
            .set("Curricular_units_1st_sem_credited", 6.0)
            .set("GDP", 1.74)
            .set("Unemployment_rate", 10.8);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn sample_covers_every_required_field() {
        let record = StudentRecord::sample();
        for name in schema::feature_names() {
            assert!(record.contains(name), "sample missing {name}");
        }
    }

    #[test]
    fn sample_values_are_in_domain() {
        let record = StudentRecord::sample();
        for spec in &schema::FEATURES {
            let value = record.get(spec.name).unwrap();
            assert!(spec.domain.contains(value), "{} = {value}", spec.name);
        }
    }

    #[test]
    fn deserializes_from_flat_json_object() {
        let record: StudentRecord =
            serde_json::from_str(r#"{"Course": 9254, "Admission_grade": 125.0}"#).unwrap();
        assert_eq!(record.get("Course"), Some(9254.0));
        assert_eq!(record.get("Admission_grade"), Some(125.0));
        assert!(record.get("Gender").is_none());
    }
}
