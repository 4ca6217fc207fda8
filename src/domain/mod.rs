// Domain types and value objects
mod field;
mod scenario;
mod snapshot;

pub use field::{FieldKind, FieldRole, FieldValue};
pub use scenario::{Scenario, ScenarioPair};
pub use snapshot::InputSnapshot;
