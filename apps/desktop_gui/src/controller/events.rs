//! Events delivered from the backend worker to the UI thread.

use client_core::{PredictError, SubmissionId};
use shared::protocol::PredictionResult;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    PredictionSettled {
        submission: SubmissionId,
        outcome: Result<PredictionResult, PredictError>,
    },
}
