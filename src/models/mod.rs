// Value objects handed to the presentation layer
mod diff_report;
mod live;

pub use diff_report::{DiffReport, FieldDiff};
pub use live::{HistoryEntry, LiveUpdate};
