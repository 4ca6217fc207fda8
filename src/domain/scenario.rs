use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::config::ModelSchema;
use crate::domain::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum Scenario {
    #[strum(to_string = "Scenario A")]
    A,
    #[strum(to_string = "Scenario B")]
    B,
}

impl Scenario {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Lower-case key used on the wire (`"a"` / `"b"`).
    pub fn key(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

/// Two scenarios submitted together for comparison.
///
/// Shared fields are held once and copied into both sides when merged, so
/// the two merged snapshots can never disagree on them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPair {
    shared: InputSnapshot,
    a: InputSnapshot,
    b: InputSnapshot,
}

impl ScenarioPair {
    pub fn new(shared: InputSnapshot, a: InputSnapshot, b: InputSnapshot) -> Self {
        Self { shared, a, b }
    }

    pub fn shared(&self) -> &InputSnapshot {
        &self.shared
    }

    /// Scenario-specific fields only.
    pub fn specific(&self, scenario: Scenario) -> &InputSnapshot {
        match scenario {
            Scenario::A => &self.a,
            Scenario::B => &self.b,
        }
    }

    /// Shared fields plus that scenario's own fields. Shared values take
    /// precedence so a scenario cannot shadow them.
    pub fn merged(&self, scenario: Scenario) -> InputSnapshot {
        self.specific(scenario).merged_with(&self.shared)
    }

    /// Canonical copy with text trimmed and category aliases resolved.
    pub fn normalized(&self, schema: &ModelSchema) -> Self {
        Self {
            shared: self.shared.normalized(schema),
            a: self.a.normalized(schema),
            b: self.b.normalized(schema),
        }
    }
}
