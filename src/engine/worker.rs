use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use super::messages::{JobResult, PredictionJob};

use crate::data::PredictionClient;
use crate::utils::{AppInstant, elapsed_ms};

/// Runs one prediction and tags the answer with the job's sequence.
pub(crate) async fn process_job(client: &dyn PredictionClient, job: PredictionJob) -> JobResult {
    let start = AppInstant::now();
    let result = client.predict_one(&job.snapshot).await;
    JobResult {
        sequence: job.sequence,
        duration_ms: elapsed_ms(start),
        result,
    }
}

/// Fires the request on its own task. The task is never aborted: if the
/// engine has moved on, the answer is simply discarded by sequence.
pub(crate) fn spawn_job(
    client: Arc<dyn PredictionClient>,
    job: PredictionJob,
    tx: UnboundedSender<JobResult>,
) {
    tokio::spawn(async move {
        let response = process_job(client.as_ref(), job).await;

        log::debug!(
            "WORKER: request #{} finished in {}ms ({})",
            response.sequence,
            response.duration_ms,
            if response.result.is_ok() { "ok" } else { "error" }
        );

        // Receiver gone means the engine was disposed
        let _ = tx.send(response);
    });
}
