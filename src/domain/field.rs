use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// A single input value as the Input Source hands it over.
///
/// Controls may report numbers either already parsed or as raw text, so a
/// numeric field is allowed to arrive as `Text("12.5")`. The validator decides
/// whether it is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Finite numeric reading of the value, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0" so 1999 compares equal to "1999"
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{:.0}", n),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// Shared fields apply to both scenarios in compare mode; scenario fields
/// describe the outlet/context and differ per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FieldRole {
    Shared,
    Scenario,
}
