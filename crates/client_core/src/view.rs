//! What each submission status renders as.

use shared::protocol::ResultVariant;

use crate::controller::SubmissionStatus;

pub const SUBMIT_LABEL_IDLE: &str = "Check Transaction";
pub const SUBMIT_LABEL_BUSY: &str = "Checking...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel<'a> {
    pub verdict: &'a str,
    pub probability_line: String,
    pub variant: ResultVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPanel<'a> {
    pub message: &'a str,
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            SUBMIT_LABEL_BUSY
        } else {
            SUBMIT_LABEL_IDLE
        }
    }

    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting()
    }

    pub fn result_panel(&self) -> Option<ResultPanel<'_>> {
        match self {
            SubmissionStatus::Succeeded(result) => Some(ResultPanel {
                verdict: result.prediction.as_str(),
                probability_line: format!("Probability of Fraud: {}", result.fraud_probability),
                variant: result.variant(),
            }),
            _ => None,
        }
    }

    pub fn error_panel(&self) -> Option<ErrorPanel<'_>> {
        match self {
            SubmissionStatus::Failed(message) => Some(ErrorPanel {
                message: message.as_str(),
            }),
            _ => None,
        }
    }
}
