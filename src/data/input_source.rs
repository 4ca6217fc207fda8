use crate::domain::InputSnapshot;

/// Pull interface onto whatever collects the raw field values (form
/// controls, a test fixture, stdin).
pub trait InputSource: Send + Sync {
    /// The current values, captured at the moment of the call.
    fn snapshot(&self) -> InputSnapshot;
}
