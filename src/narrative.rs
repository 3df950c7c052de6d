//! Presentation-level narrative derived from the raw record.
//!
//! Simple per-field threshold checks used to annotate a prediction for
//! display. These are not derived from the model and carry no weight in
//! the classification itself.

use serde::Serialize;

use crate::record::StudentRecord;

/// Unemployment rate above which the economy counts as a risk factor.
const HIGH_UNEMPLOYMENT: f64 = 12.0;

/// Circumstances that plausibly raise dropout risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Outstanding debt to the institution.
    Debtor,
    /// Tuition fees not up to date.
    TuitionOverdue,
    /// Displaced from their home region.
    Displaced,
    /// Unemployment rate above the high-water mark.
    HighUnemployment,
    /// Negative GDP growth.
    EconomicDownturn,
}

impl RiskFactor {
    /// Human-readable description for display.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Debtor => "Outstanding debt",
            Self::TuitionOverdue => "Tuition fees not up to date",
            Self::Displaced => "Displaced student",
            Self::HighUnemployment => "High unemployment rate",
            Self::EconomicDownturn => "Declining economic conditions",
        }
    }
}

/// Circumstances that plausibly support continued enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositiveFactor {
    /// Holds a scholarship.
    ScholarshipHolder,
    /// Tuition fees fully paid.
    TuitionPaid,
    /// No outstanding debt.
    DebtFree,
    /// Stable housing situation.
    StableHousing,
}

impl PositiveFactor {
    /// Human-readable description for display.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ScholarshipHolder => "Scholarship holder",
            Self::TuitionPaid => "Tuition fees up to date",
            Self::DebtFree => "No outstanding debt",
            Self::StableHousing => "Stable housing situation",
        }
    }
}

/// Risk factors present in the record, in display order.
pub fn risk_factors(record: &StudentRecord) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    if record.get("Debtor") == Some(1.0) {
        factors.push(RiskFactor::Debtor);
    }
    if record.get("Tuition_fees_up_to_date") == Some(0.0) {
        factors.push(RiskFactor::TuitionOverdue);
    }
    if record.get("Displaced") == Some(1.0) {
        factors.push(RiskFactor::Displaced);
    }
    if record
        .unemployment_rate()
        .is_some_and(|rate| rate > HIGH_UNEMPLOYMENT)
    {
        factors.push(RiskFactor::HighUnemployment);
    }
    if record.gdp().is_some_and(|gdp| gdp < 0.0) {
        factors.push(RiskFactor::EconomicDownturn);
    }
    factors
}

/// Supporting factors present in the record, in display order.
pub fn positive_factors(record: &StudentRecord) -> Vec<PositiveFactor> {
    let mut factors = Vec::new();
    if record.get("Scholarship_holder") == Some(1.0) {
        factors.push(PositiveFactor::ScholarshipHolder);
    }
    if record.get("Tuition_fees_up_to_date") == Some(1.0) {
        factors.push(PositiveFactor::TuitionPaid);
    }
    if record.get("Debtor") == Some(0.0) {
        factors.push(PositiveFactor::DebtFree);
    }
    if record.get("Displaced") == Some(0.0) {
        factors.push(PositiveFactor::StableHousing);
    }
    factors
}
