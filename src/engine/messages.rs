use std::time::Duration;

use crate::analysis::ValidationReport;
use crate::domain::InputSnapshot;
use crate::errors::ServiceError;
use crate::models::LiveUpdate;

/// A request for the worker to score one snapshot.
#[derive(Debug, Clone)]
pub struct PredictionJob {
    pub sequence: u64,
    pub snapshot: InputSnapshot,
}

/// The result returned by the worker, still tagged with its sequence.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub sequence: u64,
    pub duration_ms: u128,
    pub result: Result<f64, ServiceError>,
}

/// Everything that can wake the scheduler up.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// Some field changed; carries the values at the time of the change.
    InputChanged(InputSnapshot),
    /// The debounce timer armed with `token` expired; carries the values
    /// pulled from the input source at expiry.
    TimerFired { token: u64, snapshot: InputSnapshot },
    ResultArrived(JobResult),
}

/// What the scheduler asks its driver to do after handling an event.
#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    /// (Re)start the debounce timer. Any earlier timer is superseded.
    ArmTimer { token: u64, delay: Duration },
    CancelTimer,
    Dispatch(PredictionJob),
    Publish(EngineOutput),
}

/// What the presentation layer receives.
#[derive(Debug, Clone)]
pub enum EngineOutput {
    Accepted(LiveUpdate),
    Failed { sequence: u64, error: ServiceError },
    Invalid(ValidationReport),
}
