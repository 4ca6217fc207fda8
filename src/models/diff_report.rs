use serde::Serialize;

use crate::domain::Scenario;

/// One row of the inputs-diff table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub label: String,
    pub value_a: String,
    pub value_b: String,
}

/// Everything the presentation layer needs to show a comparison.
/// Recomputed from scratch for every comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub value_a: f64,
    pub value_b: f64,
    /// `None` when the difference is negligible.
    pub winner: Option<Scenario>,
    pub margin_absolute: f64,
    /// Margin relative to the lower value, one decimal. `None` when negligible
    /// or when the lower value is zero.
    pub margin_percent: Option<f64>,
    pub negligible: bool,
    pub field_diffs: Vec<FieldDiff>,
    /// Primary driver field, cited only when a winner exists and the
    /// scenarios differ on it.
    pub largest_contributor: Option<String>,
    pub recommendation: String,
    pub vs_average_a: Option<f64>,
    pub vs_average_b: Option<f64>,
    /// Each value as a percentage of the larger one.
    pub bar_width_a: f64,
    pub bar_width_b: f64,
}

impl DiffReport {
    pub fn value(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::A => self.value_a,
            Scenario::B => self.value_b,
        }
    }

    pub fn differs_on(&self, field: &str) -> bool {
        self.field_diffs.iter().any(|d| d.field == field)
    }
}
