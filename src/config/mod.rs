//! Configuration module for the what-if engine.

// Can all be private now because we have a public re-export.
mod debug;
mod engine;
mod fields;
mod service;

// Re-export commonly used items
pub use debug::DF;
pub use engine::{ENGINE, EngineConfig};
pub use fields::{BIG_MART, ComparisonProfile, FieldSpec, ModelSchema};
pub use service::{SERVICE, ServiceConfig};
