use std::sync::Arc;

use crate::analysis::{self, Validator};
use crate::config::{EngineConfig, ModelSchema};
use crate::data::PredictionClient;
use crate::domain::{InputSnapshot, ScenarioPair};
use crate::errors::EngineResult;
use crate::models::DiffReport;
use crate::utils::{AppInstant, elapsed_ms};

/// One-shot comparison of two scenarios through a single paired request.
///
/// Unlike the live engine there is no debouncing: every call is an explicit
/// submission. Validation happens before any network traffic.
pub struct ComparisonSession {
    client: Arc<dyn PredictionClient>,
    schema: &'static ModelSchema,
    config: EngineConfig,
}

impl ComparisonSession {
    pub fn new(
        config: EngineConfig,
        schema: &'static ModelSchema,
        client: Arc<dyn PredictionClient>,
    ) -> Self {
        Self {
            client,
            schema,
            config,
        }
    }

    pub async fn compare(&self, pair: &ScenarioPair) -> EngineResult<DiffReport> {
        let pair = pair.normalized(self.schema);
        Validator::new(self.schema).validate_pair(&pair)?;

        let start = AppInstant::now();
        let (value_a, value_b) = self.client.predict_pair(&pair).await?;

        log::debug!(
            "COMPARE: paired prediction in {}ms: A={:.2} B={:.2}",
            elapsed_ms(start),
            value_a,
            value_b
        );

        Ok(analysis::compare(
            &pair,
            value_a,
            value_b,
            self.schema,
            &self.config,
        ))
    }

    /// Convenience for callers holding the three field groups separately.
    pub async fn compare_parts(
        &self,
        shared: InputSnapshot,
        a: InputSnapshot,
        b: InputSnapshot,
    ) -> EngineResult<DiffReport> {
        self.compare(&ScenarioPair::new(shared, a, b)).await
    }
}
