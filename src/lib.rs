#![allow(clippy::collapsible_if)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod models;
mod shared;
pub mod utils;

// Re-export commonly used types outside of crate (for the binary and tests)
pub use config::{BIG_MART, ENGINE, EngineConfig, ModelSchema, SERVICE, ServiceConfig};
pub use data::{HttpPredictionClient, InputSource, PredictionClient};
pub use domain::{FieldValue, InputSnapshot, Scenario, ScenarioPair};
pub use engine::{ComparisonSession, EngineHandle, EngineOutput, RequestScheduler, WhatIfEngine};
pub use errors::{EngineError, EngineResult, ServiceError, ValidationError};
pub use models::{DiffReport, HistoryEntry, LiveUpdate};
pub use shared::SharedInputSource;

// CLI argument parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the prediction service
    #[arg(long, global = true, default_value = SERVICE.base_url)]
    pub base_url: String,

    /// Quiet period before a live prediction is requested
    #[arg(long, global = true, default_value_t = ENGINE.debounce.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Per-request timeout
    #[arg(long, global = true, default_value_t = SERVICE.timeout_ms)]
    pub timeout_ms: u64,

    /// Log engine internals at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Predict sales for one or more complete snapshots (JSON objects)
    Predict {
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
    },
    /// Compare two outlet scenarios for the same item
    Compare {
        /// Item fields shared by both scenarios
        shared: PathBuf,
        /// Outlet fields for Scenario A
        a: PathBuf,
        /// Outlet fields for Scenario B
        b: PathBuf,
    },
    /// Live what-if session: reads `Field=value` edits from stdin
    Live {
        /// Starting snapshot
        base: PathBuf,
    },
}
