use std::collections::BTreeMap;

use crate::analysis::{ValidationReport, Validator};
use crate::config::{EngineConfig, ModelSchema};
use crate::domain::InputSnapshot;
use crate::errors::ServiceError;
use crate::models::{HistoryEntry, LiveUpdate};
use crate::utils::{percent_change, round_to};

use super::history::HistoryBuffer;
use super::messages::{EngineOutput, JobResult, PredictionJob, SchedulerCommand, SchedulerEvent};

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Nothing scheduled, nothing outstanding.
    Idle,
    /// Debounce timer running.
    Pending,
    /// At least one request outstanding and no timer running.
    InFlight,
}

/// Debounce and staleness state machine.
///
/// Pure: it never sleeps and never touches the network. The driver feeds it
/// events and carries out the returned commands, which keeps every race in
/// here testable with plain function calls.
#[derive(Debug)]
pub struct RequestScheduler {
    schema: &'static ModelSchema,
    config: EngineConfig,
    phase: SchedulerPhase,

    /// Identifies the currently armed timer; stale expiries are ignored.
    timer_token: u64,
    next_sequence: u64,
    /// Highest sequence whose result has been accepted (0 = none yet).
    watermark: u64,
    /// Issued but unanswered requests and the inputs they were built from.
    outstanding: BTreeMap<u64, InputSnapshot>,

    history: HistoryBuffer,
    last_value: Option<f64>,
    last_error: Option<ServiceError>,
    invalid: Option<ValidationReport>,
}

impl RequestScheduler {
    pub fn new(config: EngineConfig, schema: &'static ModelSchema) -> Self {
        Self {
            schema,
            history: HistoryBuffer::new(config.history_capacity),
            config,
            phase: SchedulerPhase::Idle,
            timer_token: 0,
            next_sequence: 1,
            watermark: 0,
            outstanding: BTreeMap::new(),
            last_value: None,
            last_error: None,
            invalid: None,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn watermark(&self) -> u64 {
        self.watermark
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Latest accepted value, i.e. what is on screen.
    pub fn current_value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    /// Set while the most recent input change was invalid.
    pub fn validation_state(&self) -> Option<&ValidationReport> {
        self.invalid.as_ref()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn handle(&mut self, event: SchedulerEvent) -> Vec<SchedulerCommand> {
        let commands = match event {
            SchedulerEvent::InputChanged(snapshot) => self.on_input_changed(snapshot),
            SchedulerEvent::TimerFired { token, snapshot } => self.on_timer_fired(token, snapshot),
            SchedulerEvent::ResultArrived(result) => self.on_result(result),
        };

        #[cfg(debug_assertions)]
        if DF.log_scheduler {
            log::debug!(
                "SCHEDULER: phase={:?} watermark={} outstanding={} -> {} command(s)",
                self.phase,
                self.watermark,
                self.outstanding.len(),
                commands.len()
            );
        }

        commands
    }

    fn on_input_changed(&mut self, snapshot: InputSnapshot) -> Vec<SchedulerCommand> {
        let report = self.validate(&snapshot);
        if !report.is_valid() {
            return self.suppress(report);
        }

        self.invalid = None;
        self.timer_token += 1;
        self.phase = SchedulerPhase::Pending;
        vec![SchedulerCommand::ArmTimer {
            token: self.timer_token,
            delay: self.config.debounce,
        }]
    }

    fn on_timer_fired(&mut self, token: u64, snapshot: InputSnapshot) -> Vec<SchedulerCommand> {
        if self.phase != SchedulerPhase::Pending || token != self.timer_token {
            return Vec::new();
        }

        // Values may have moved since the change event; re-check what we send
        let report = self.validate(&snapshot);
        if !report.is_valid() {
            return self.suppress(report);
        }

        let snapshot = snapshot.normalized(self.schema);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.outstanding.insert(sequence, snapshot.clone());
        self.phase = SchedulerPhase::InFlight;

        #[cfg(debug_assertions)]
        if DF.log_scheduler {
            log::info!("SCHEDULER: dispatching request #{}", sequence);
        }

        vec![SchedulerCommand::Dispatch(PredictionJob { sequence, snapshot })]
    }

    fn on_result(&mut self, result: JobResult) -> Vec<SchedulerCommand> {
        let Some(inputs) = self.outstanding.remove(&result.sequence) else {
            log::warn!(
                "SCHEDULER: result for unknown request #{} ignored",
                result.sequence
            );
            return Vec::new();
        };

        if self.phase == SchedulerPhase::InFlight && self.outstanding.is_empty() {
            self.phase = SchedulerPhase::Idle;
        }

        if result.sequence <= self.watermark {
            log::debug!(
                "SCHEDULER: stale result #{} discarded (watermark #{})",
                result.sequence,
                self.watermark
            );
            return Vec::new();
        }

        // Any answer, success or failure, supersedes older requests
        self.watermark = result.sequence;

        match result.result {
            Ok(value) => {
                let update = self.accept(result.sequence, value, inputs);
                vec![SchedulerCommand::Publish(EngineOutput::Accepted(update))]
            }
            Err(error) => {
                log::warn!("SCHEDULER: request #{} failed: {}", result.sequence, error);
                self.last_error = Some(error.clone());
                vec![SchedulerCommand::Publish(EngineOutput::Failed {
                    sequence: result.sequence,
                    error,
                })]
            }
        }
    }

    fn accept(&mut self, sequence: u64, value: f64, inputs: InputSnapshot) -> LiveUpdate {
        self.watermark = sequence;
        self.history.append(HistoryEntry { sequence, value });

        let delta_from_last = self
            .last_value
            .map(|prev| value - prev)
            .filter(|d| d.abs() >= self.config.min_visible_delta);
        self.last_value = Some(value);
        self.last_error = None;

        LiveUpdate {
            sequence,
            value,
            vs_average_pct: percent_change(value, self.config.dataset_average)
                .map(|p| round_to(p, 1)),
            delta_from_last,
            inputs,
            history: self.history.snapshot(),
        }
    }

    /// Records an invalid input state and drops any pending timer.
    fn suppress(&mut self, report: ValidationReport) -> Vec<SchedulerCommand> {
        let mut commands = Vec::new();
        if self.phase == SchedulerPhase::Pending {
            self.timer_token += 1;
            self.phase = if self.outstanding.is_empty() {
                SchedulerPhase::Idle
            } else {
                SchedulerPhase::InFlight
            };
            commands.push(SchedulerCommand::CancelTimer);
        }

        #[cfg(debug_assertions)]
        if DF.log_scheduler {
            log::info!(
                "SCHEDULER: invalid input, not scheduling ({})",
                report.offending_fields().join(", ")
            );
        }

        self.invalid = Some(report.clone());
        commands.push(SchedulerCommand::Publish(EngineOutput::Invalid(report)));
        commands
    }

    fn validate(&self, snapshot: &InputSnapshot) -> ValidationReport {
        Validator::new(self.schema).check(&snapshot.normalized(self.schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BIG_MART, ENGINE};

    fn valid(mrp: f64) -> InputSnapshot {
        InputSnapshot::new()
            .with("Item_Weight", 9.3)
            .with("Item_Fat_Content", "Low Fat")
            .with("Item_Visibility", 0.016)
            .with("Item_Type", "Dairy")
            .with("Item_MRP", mrp)
            .with("Outlet_Type", "Supermarket Type1")
            .with("Outlet_Size", "Medium")
            .with("Outlet_Location_Type", "Tier 1")
            .with("Outlet_Establishment_Year", 1999)
            .with("Outlet_Identifier", "OUT049")
    }

    fn scheduler() -> RequestScheduler {
        RequestScheduler::new(ENGINE.clone(), &BIG_MART)
    }

    fn armed_token(cmds: &[SchedulerCommand]) -> u64 {
        match cmds {
            [SchedulerCommand::ArmTimer { token, .. }] => *token,
            other => panic!("expected a single ArmTimer, got {:?}", other),
        }
    }

    fn dispatched(cmds: &[SchedulerCommand]) -> PredictionJob {
        match cmds {
            [SchedulerCommand::Dispatch(job)] => job.clone(),
            other => panic!("expected a single Dispatch, got {:?}", other),
        }
    }

    fn ok(sequence: u64, value: f64) -> SchedulerEvent {
        SchedulerEvent::ResultArrived(JobResult {
            sequence,
            duration_ms: 5,
            result: Ok(value),
        })
    }

    /// Change, then fire the latest timer, returning the dispatched job.
    fn issue(s: &mut RequestScheduler, snapshot: InputSnapshot) -> PredictionJob {
        let token = armed_token(&s.handle(SchedulerEvent::InputChanged(snapshot.clone())));
        dispatched(&s.handle(SchedulerEvent::TimerFired { token, snapshot }))
    }

    #[test]
    fn rapid_changes_coalesce_into_one_request() {
        let mut s = scheduler();
        let mut tokens = Vec::new();
        for mrp in [100.0, 110.0, 120.0, 130.0] {
            tokens.push(armed_token(&s.handle(SchedulerEvent::InputChanged(valid(mrp)))));
            assert_eq!(s.phase(), SchedulerPhase::Pending);
        }

        // Superseded timers do nothing
        for &token in &tokens[..3] {
            let cmds = s.handle(SchedulerEvent::TimerFired {
                token,
                snapshot: valid(130.0),
            });
            assert!(cmds.is_empty());
        }

        let job = dispatched(&s.handle(SchedulerEvent::TimerFired {
            token: tokens[3],
            snapshot: valid(130.0),
        }));
        assert_eq!(job.sequence, 1);
        assert_eq!(job.snapshot.display_value("Item_MRP"), "130");
        assert_eq!(s.phase(), SchedulerPhase::InFlight);
        assert_eq!(s.outstanding(), 1);
    }

    #[test]
    fn accepted_result_returns_to_idle_and_records_history() {
        let mut s = scheduler();
        let job = issue(&mut s, valid(150.0));
        let cmds = s.handle(ok(job.sequence, 2500.0));
        let [SchedulerCommand::Publish(EngineOutput::Accepted(update))] = cmds.as_slice() else {
            panic!("expected Accepted, got {:?}", cmds);
        };
        assert_eq!(update.value, 2500.0);
        assert_eq!(update.delta_from_last, None);
        assert_eq!(update.vs_average_pct, Some(14.6));
        assert_eq!(update.history.len(), 1);
        assert_eq!(s.phase(), SchedulerPhase::Idle);
        assert_eq!(s.watermark(), 1);
        assert_eq!(s.current_value(), Some(2500.0));
    }

    #[test]
    fn late_older_result_is_discarded() {
        let mut s = scheduler();
        let first = issue(&mut s, valid(100.0));
        let second = issue(&mut s, valid(200.0));
        assert_eq!((first.sequence, second.sequence), (1, 2));

        // Newer answer lands first
        assert_eq!(s.handle(ok(2, 4000.0)).len(), 1);
        assert_eq!(s.phase(), SchedulerPhase::InFlight);

        // Older one arrives late and is dropped silently
        assert!(s.handle(ok(1, 1000.0)).is_empty());
        assert_eq!(s.current_value(), Some(4000.0));
        assert_eq!(s.watermark(), 2);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.phase(), SchedulerPhase::Idle);
    }

    #[test]
    fn in_order_results_are_both_accepted_with_delta() {
        let mut s = scheduler();
        issue(&mut s, valid(100.0));
        issue(&mut s, valid(200.0));
        s.handle(ok(1, 1000.0));
        let cmds = s.handle(ok(2, 1500.4));
        let [SchedulerCommand::Publish(EngineOutput::Accepted(update))] = cmds.as_slice() else {
            panic!("expected Accepted");
        };
        assert!((update.delta_from_last.unwrap() - 500.4).abs() < 1e-9);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn tiny_delta_is_hidden() {
        let mut s = scheduler();
        issue(&mut s, valid(100.0));
        s.handle(ok(1, 1000.0));
        issue(&mut s, valid(100.1));
        let cmds = s.handle(ok(2, 1000.5));
        let [SchedulerCommand::Publish(EngineOutput::Accepted(update))] = cmds.as_slice() else {
            panic!("expected Accepted");
        };
        assert_eq!(update.delta_from_last, None);
    }

    #[test]
    fn change_while_in_flight_goes_pending() {
        let mut s = scheduler();
        issue(&mut s, valid(100.0));
        s.handle(SchedulerEvent::InputChanged(valid(101.0)));
        assert_eq!(s.phase(), SchedulerPhase::Pending);

        // The outstanding answer still lands, phase stays Pending
        assert_eq!(s.handle(ok(1, 900.0)).len(), 1);
        assert_eq!(s.phase(), SchedulerPhase::Pending);
    }

    #[test]
    fn invalid_change_suppresses_scheduling() {
        let mut s = scheduler();
        let cmds = s.handle(SchedulerEvent::InputChanged(valid(100.0).without("Item_MRP")));
        assert!(matches!(
            cmds.as_slice(),
            [SchedulerCommand::Publish(EngineOutput::Invalid(_))]
        ));
        assert_eq!(s.phase(), SchedulerPhase::Idle);
        assert_eq!(
            s.validation_state().map(|r| r.offending_fields()),
            Some(vec!["Item_MRP".to_string()])
        );
    }

    #[test]
    fn invalid_change_cancels_pending_timer() {
        let mut s = scheduler();
        let token = armed_token(&s.handle(SchedulerEvent::InputChanged(valid(100.0))));
        let bad = valid(100.0).with("Item_Weight", "heavy");
        let cmds = s.handle(SchedulerEvent::InputChanged(bad.clone()));
        assert!(matches!(cmds[0], SchedulerCommand::CancelTimer));
        assert_eq!(s.phase(), SchedulerPhase::Idle);
        assert!(
            s.handle(SchedulerEvent::TimerFired {
                token,
                snapshot: bad
            })
            .is_empty()
        );

        // Fixing the input clears the invalid state
        s.handle(SchedulerEvent::InputChanged(valid(100.0)));
        assert!(s.validation_state().is_none());
        assert_eq!(s.phase(), SchedulerPhase::Pending);
    }

    #[test]
    fn service_error_is_surfaced_and_engine_recovers() {
        let mut s = scheduler();
        issue(&mut s, valid(100.0));
        let cmds = s.handle(SchedulerEvent::ResultArrived(JobResult {
            sequence: 1,
            duration_ms: 3,
            result: Err(ServiceError::Rejected("model offline".into())),
        }));
        assert!(matches!(
            cmds.as_slice(),
            [SchedulerCommand::Publish(EngineOutput::Failed { sequence: 1, .. })]
        ));
        assert_eq!(s.phase(), SchedulerPhase::Idle);
        assert_eq!(s.watermark(), 1);
        assert_eq!(s.current_value(), None);

        let job = issue(&mut s, valid(120.0));
        assert_eq!(job.sequence, 2);
        s.handle(ok(2, 1800.0));
        assert!(s.last_error().is_none());
        assert_eq!(s.current_value(), Some(1800.0));
    }

    #[test]
    fn error_for_superseded_request_is_dropped() {
        let mut s = scheduler();
        issue(&mut s, valid(100.0));
        issue(&mut s, valid(200.0));
        s.handle(ok(2, 2000.0));
        let cmds = s.handle(SchedulerEvent::ResultArrived(JobResult {
            sequence: 1,
            duration_ms: 3,
            result: Err(ServiceError::Unreachable("timeout".into())),
        }));
        assert!(cmds.is_empty());
        assert!(s.last_error().is_none());
    }

    #[test]
    fn older_success_after_newer_error_is_discarded() {
        let mut s = scheduler();
        issue(&mut s, valid(100.0));
        issue(&mut s, valid(200.0));

        let cmds = s.handle(SchedulerEvent::ResultArrived(JobResult {
            sequence: 2,
            duration_ms: 3,
            result: Err(ServiceError::Rejected("model offline".into())),
        }));
        assert!(matches!(
            cmds.as_slice(),
            [SchedulerCommand::Publish(EngineOutput::Failed { sequence: 2, .. })]
        ));

        assert!(s.handle(ok(1, 1000.0)).is_empty());
        assert_eq!(s.current_value(), None);
        assert!(s.history().is_empty());
        assert_eq!(s.watermark(), 2);
        assert!(s.last_error().is_some());
        assert_eq!(s.phase(), SchedulerPhase::Idle);
    }

    #[test]
    fn history_is_capped() {
        let mut s = scheduler();
        for i in 1..=25u64 {
            issue(&mut s, valid(100.0 + i as f64));
            s.handle(ok(i, 1000.0 + i as f64 * 10.0));
        }
        let history = s.history().snapshot();
        assert_eq!(history.len(), 20);
        assert_eq!(history.first().map(|e| e.sequence), Some(6));
        assert_eq!(history.last().map(|e| e.sequence), Some(25));
    }

    #[test]
    fn unknown_sequence_is_ignored() {
        let mut s = scheduler();
        assert!(s.handle(ok(7, 1.0)).is_empty());
        assert_eq!(s.phase(), SchedulerPhase::Idle);
    }
}
