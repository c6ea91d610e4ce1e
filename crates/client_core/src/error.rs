use shared::domain::FieldName;
use thiserror::Error;

/// Why a prediction request did not produce a verdict. Only ever logged; the
/// UI collapses every variant to one generic message.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid prediction service url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed prediction response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("prediction service reported an error: {0}")]
    Service(String),
    /// The request never left the client.
    #[error("prediction request not sent: {0}")]
    Unsent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a prediction request is already in flight")]
    InFlight,
    #[error("non-numeric fields: {}", join_fields(.0))]
    InvalidFields(Vec<FieldName>),
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
