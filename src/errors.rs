//! Error taxonomy for the engine.
//!
//! Nothing in here is fatal: every error ends the current request only and the
//! engine keeps accepting input changes afterwards.

use thiserror::Error;

/// A snapshot (or scenario pair) failed validation before any network call.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("incomplete or malformed input: {}", fields.join(", "))]
pub struct ValidationError {
    /// Offending field names, in schema order.
    pub fields: Vec<String>,
}

/// The prediction service could not produce a usable value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("prediction service unreachable: {0}")]
    Unreachable(String),

    #[error("prediction service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// `{ success: false, error }` from the service, passed through verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("malformed prediction payload: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
