//! Form state machine: field edits, submission lifecycle and outcome.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::Deserialize;
use shared::{
    domain::{FieldName, FormState},
    error::UnknownField,
    protocol::{PredictionResult, TransactionRequest},
};
use tracing::{error, info, warn};

use crate::{
    error::{PredictError, SubmitRejected},
    PredictionService,
};

pub const FAILED_SUBMISSION_MESSAGE: &str = "An error occurred while making the prediction. Please ensure the backend is running and the input values are correct.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Editing,
    Submitting,
    Succeeded(PredictionResult),
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Non-numeric text is sent as `NaN`.
    #[default]
    Lenient,
    /// Submission is refused while any field is non-numeric.
    Strict,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown validation mode '{other}' (lenient|strict)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Submissions may overlap; whichever response settles last is shown.
    #[default]
    Allow,
    /// A new submission is refused while one is outstanding.
    SingleFlight,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "single_flight" | "single-flight" => Ok(Self::SingleFlight),
            other => Err(format!(
                "unknown overlap policy '{other}' (allow|single_flight)"
            )),
        }
    }
}

/// A request built by [`FormController::begin_submit`], to be settled with
/// [`FormController::complete_submit`].
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub request: TransactionRequest,
}

#[derive(Debug, Default)]
pub struct FormController {
    form: FormState,
    status: SubmissionStatus,
    validation: ValidationMode,
    overlap: OverlapPolicy,
    next_submission: u64,
    in_flight: BTreeSet<SubmissionId>,
}

impl FormController {
    pub fn new(validation: ValidationMode, overlap: OverlapPolicy) -> Self {
        Self {
            validation,
            overlap,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn on_field_change(&mut self, field: FieldName, raw: impl Into<String>) {
        self.form.set(field, raw);
    }

    pub fn on_named_field_change(
        &mut self,
        name: &str,
        raw: impl Into<String>,
    ) -> Result<(), UnknownField> {
        self.form.set_named(name, raw)
    }

    /// Enters `Submitting`, dropping any previous result or error, and returns
    /// the request to send. A rejection leaves the status untouched.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.overlap == OverlapPolicy::SingleFlight && !self.in_flight.is_empty() {
            return Err(SubmitRejected::InFlight);
        }
        if self.validation == ValidationMode::Strict {
            let invalid = self.form.invalid_fields();
            if !invalid.is_empty() {
                return Err(SubmitRejected::InvalidFields(invalid));
            }
        }

        self.next_submission += 1;
        let id = SubmissionId(self.next_submission);
        self.in_flight.insert(id);
        self.status = SubmissionStatus::Submitting;

        let request = self.form.to_request();
        let nan_fields = request.nan_fields();
        if !nan_fields.is_empty() {
            warn!(
                submission = %id,
                count = nan_fields.len(),
                "submitting non-numeric fields as NaN"
            );
        }
        info!(submission = %id, in_flight = self.in_flight.len(), "prediction submitted");

        Ok(Submission { id, request })
    }

    /// Settles a submission. The latest settled submission always determines
    /// the status, even while others are outstanding.
    pub fn complete_submit(
        &mut self,
        id: SubmissionId,
        outcome: Result<PredictionResult, PredictError>,
    ) {
        if !self.in_flight.remove(&id) {
            warn!(submission = %id, "ignoring outcome for unknown submission");
            return;
        }

        self.status = match outcome {
            Ok(result) => {
                info!(
                    submission = %id,
                    verdict = %result.prediction,
                    is_fraud = result.is_fraud,
                    probability = %result.fraud_probability,
                    "prediction settled"
                );
                SubmissionStatus::Succeeded(result)
            }
            Err(err) => {
                error!(submission = %id, error = %err, "prediction request failed");
                SubmissionStatus::Failed(FAILED_SUBMISSION_MESSAGE.to_string())
            }
        };
    }

    pub async fn submit_with<S>(&mut self, service: &S) -> Result<&SubmissionStatus, SubmitRejected>
    where
        S: PredictionService + ?Sized,
    {
        let submission = self.begin_submit()?;
        let outcome = service.predict(&submission.request).await;
        self.complete_submit(submission.id, outcome);
        Ok(&self.status)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
