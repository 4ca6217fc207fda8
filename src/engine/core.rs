use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::{EngineConfig, ModelSchema};
use crate::data::{InputSource, PredictionClient};
use crate::models::HistoryEntry;

use super::messages::{EngineOutput, JobResult, SchedulerCommand, SchedulerEvent};
use super::scheduler::RequestScheduler;
use super::worker;

/// The live what-if engine: one debounced, race-safe prediction stream over
/// an input source.
///
/// Built with explicit configuration, then `start`ed onto the current tokio
/// runtime. All state lives inside the single task that `start` spawns, so
/// no two events are ever processed at the same time.
pub struct WhatIfEngine {
    scheduler: RequestScheduler,
    source: Arc<dyn InputSource>,
    client: Arc<dyn PredictionClient>,
}

/// Caller-side end of a running engine.
///
/// Outputs are queued without a bound until `next_output` takes them. A
/// presentation layer that only needs the current state should read
/// `latest` instead and never drain the queue; the queue is then freed on
/// `dispose`.
pub struct EngineHandle {
    change_tx: mpsc::UnboundedSender<()>,
    output_rx: mpsc::UnboundedReceiver<EngineOutput>,
    latest_rx: watch::Receiver<Option<EngineOutput>>,
    history_rx: watch::Receiver<Vec<HistoryEntry>>,
    task: JoinHandle<()>,
}

impl WhatIfEngine {
    pub fn new(
        config: EngineConfig,
        schema: &'static ModelSchema,
        source: Arc<dyn InputSource>,
        client: Arc<dyn PredictionClient>,
    ) -> Self {
        Self {
            scheduler: RequestScheduler::new(config, schema),
            source,
            client,
        }
    }

    /// Spawns the event loop. Must be called from within a tokio runtime.
    pub fn start(self) -> EngineHandle {
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (latest_tx, latest_rx) = watch::channel(None);
        let (history_tx, history_rx) = watch::channel(Vec::new());

        log::info!("ENGINE: started");
        let task = tokio::spawn(self.run(change_rx, output_tx, latest_tx, history_tx));

        EngineHandle {
            change_tx,
            output_rx,
            latest_rx,
            history_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut change_rx: mpsc::UnboundedReceiver<()>,
        output_tx: mpsc::UnboundedSender<EngineOutput>,
        latest_tx: watch::Sender<Option<EngineOutput>>,
        history_tx: watch::Sender<Vec<HistoryEntry>>,
    ) {
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<JobResult>();

        let timer = tokio::time::sleep_until(Instant::now());
        tokio::pin!(timer);
        let mut armed: Option<u64> = None;

        loop {
            let event = tokio::select! {
                biased;

                msg = change_rx.recv() => match msg {
                    Some(()) => SchedulerEvent::InputChanged(self.source.snapshot()),
                    None => break,
                },

                Some(result) = result_rx.recv() => SchedulerEvent::ResultArrived(result),

                _ = &mut timer, if armed.is_some() => SchedulerEvent::TimerFired {
                    token: armed.take().unwrap_or_default(),
                    snapshot: self.source.snapshot(),
                },
            };

            for command in self.scheduler.handle(event) {
                match command {
                    SchedulerCommand::ArmTimer { token, delay } => {
                        timer.as_mut().reset(Instant::now() + delay);
                        armed = Some(token);
                    }
                    SchedulerCommand::CancelTimer => armed = None,
                    SchedulerCommand::Dispatch(job) => {
                        worker::spawn_job(self.client.clone(), job, result_tx.clone());
                    }
                    SchedulerCommand::Publish(output) => {
                        if matches!(output, EngineOutput::Accepted(_)) {
                            history_tx.send_replace(self.scheduler.history().snapshot());
                        }
                        latest_tx.send_replace(Some(output.clone()));
                        // Nobody listening is fine; the engine keeps going
                        let _ = output_tx.send(output);
                    }
                }
            }
        }

        log::info!(
            "ENGINE: stopped ({} request(s) left outstanding)",
            self.scheduler.outstanding()
        );
    }
}

impl EngineHandle {
    /// Tells the engine that some input field changed.
    pub fn input_changed(&self) {
        if self.change_tx.send(()).is_err() {
            log::warn!("ENGINE: input change after the engine stopped");
        }
    }

    /// Waits for the next output. `None` once the engine has stopped.
    pub async fn next_output(&mut self) -> Option<EngineOutput> {
        self.output_rx.recv().await
    }

    /// Most recent output, whether or not the queue has been drained.
    pub fn latest(&self) -> Option<EngineOutput> {
        self.latest_rx.borrow().clone()
    }

    /// Read-only view of the history buffer as of the last accepted result.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history_rx.borrow().clone()
    }

    /// Watch channel that changes whenever a result is accepted.
    pub fn history_watch(&self) -> watch::Receiver<Vec<HistoryEntry>> {
        self.history_rx.clone()
    }

    /// Stops the event loop and waits for it to finish. Requests still on the
    /// wire are left to complete and are ignored.
    pub async fn dispose(self) {
        let Self { change_tx, task, .. } = self;
        drop(change_tx);
        if let Err(e) = task.await {
            log::error!("ENGINE: event loop ended abnormally: {}", e);
        }
    }
}
