use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{HealthStatus, PredictResponseBody, PredictionResult, TransactionRequest};
use tracing::debug;
use url::Url;

pub mod config;
pub mod controller;
pub mod error;
pub mod view;

pub use config::{load_settings, Settings};
pub use controller::{
    FormController, OverlapPolicy, Submission, SubmissionId, SubmissionStatus, ValidationMode,
    FAILED_SUBMISSION_MESSAGE,
};
pub use error::{PredictError, SubmitRejected};
pub use view::{ErrorPanel, ResultPanel, SUBMIT_LABEL_BUSY, SUBMIT_LABEL_IDLE};

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &TransactionRequest)
        -> Result<PredictionResult, PredictError>;
}

/// Client for the prediction service's HTTP API.
///
/// No retries, no timeout override and no cancellation: each call is one POST
/// that runs until the platform gives up.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(base_url: &str) -> Result<Self, PredictError> {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> Result<Self, PredictError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|source| PredictError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus, PredictError> {
        let response = self.http.get(format!("{}/", self.base_url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(
        &self,
        request: &TransactionRequest,
    ) -> Result<PredictionResult, PredictError> {
        let url = format!("{}/predict", self.base_url);
        debug!(%url, "posting transaction for prediction");

        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<PredictResponseBody>(&body)? {
            PredictResponseBody::Verdict(result) => Ok(result),
            PredictResponseBody::Rejected(rejected) => Err(PredictError::Service(rejected.error)),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
