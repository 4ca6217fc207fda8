// Pure logic: no I/O, no timing state
mod comparator;
mod recommendation;
mod validator;

pub use comparator::{compare, field_diffs};
pub use validator::{FieldIssue, FieldProblem, ValidationReport, Validator};
