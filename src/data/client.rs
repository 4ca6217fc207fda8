use std::time::Duration;

use async_trait::async_trait;

use crate::config::ServiceConfig;
use crate::data::wire::{self, ComparePayload};
use crate::domain::{InputSnapshot, ScenarioPair};
use crate::errors::ServiceError;

#[cfg(debug_assertions)]
use crate::config::DF;

/// The only I/O boundary of the engine. No retries happen here: every
/// failure goes back to the caller as is.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Scores one snapshot.
    async fn predict_one(&self, snapshot: &InputSnapshot) -> Result<f64, ServiceError>;

    /// Scores both scenarios of a pair in a single round trip, so they see
    /// the same model state.
    async fn predict_pair(&self, pair: &ScenarioPair) -> Result<(f64, f64), ServiceError>;
}

/// `PredictionClient` talking JSON over HTTP.
pub struct HttpPredictionClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl HttpPredictionClient {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// POSTs `body` and hands back the status code and raw text.
    async fn post<B: serde::Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<(u16, String), ServiceError> {
        #[cfg(debug_assertions)]
        if DF.log_client {
            log::info!("CLIENT: POST {}", url);
        }

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        #[cfg(debug_assertions)]
        if DF.log_client {
            log::info!("CLIENT: {} <- HTTP {} ({} bytes)", url, status, text.len());
        }

        Ok((status, text))
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict_one(&self, snapshot: &InputSnapshot) -> Result<f64, ServiceError> {
        let url = self.config.predict_url();
        let (status, body) = crate::trace_time!("predict_one", 1000, {
            self.post(&url, snapshot).await?
        });
        wire::parse_single(status, &body)
    }

    async fn predict_pair(&self, pair: &ScenarioPair) -> Result<(f64, f64), ServiceError> {
        let url = self.config.compare_url();
        let payload = ComparePayload::from(pair);
        let (status, body) = crate::trace_time!("predict_pair", 1000, {
            self.post(&url, &payload).await?
        });
        wire::parse_pair(status, &body)
    }
}
