mod compare;
mod core;
mod history;
mod messages;
mod scheduler;
mod worker;

pub use compare::ComparisonSession;
pub use core::{EngineHandle, WhatIfEngine};
pub use history::HistoryBuffer;
pub use messages::{EngineOutput, JobResult, PredictionJob, SchedulerCommand, SchedulerEvent};
pub use scheduler::{RequestScheduler, SchedulerPhase};
