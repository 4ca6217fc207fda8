use serde::Serialize;

use crate::domain::InputSnapshot;

/// An accepted result as kept by the history buffer. Never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub value: f64,
}

/// A freshly accepted live prediction, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveUpdate {
    pub sequence: u64,
    pub value: f64,
    /// Percentage above/below the dataset average, one decimal.
    pub vs_average_pct: Option<f64>,
    /// Change from the previously accepted value, when noticeable.
    pub delta_from_last: Option<f64>,
    /// The snapshot this value was predicted from.
    pub inputs: InputSnapshot,
    /// History buffer contents after this value was appended.
    pub history: Vec<HistoryEntry>,
}
