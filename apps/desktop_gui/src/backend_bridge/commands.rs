//! Backend commands queued from UI to backend worker.

use client_core::SubmissionId;
use shared::protocol::TransactionRequest;

#[derive(Debug)]
pub enum BackendCommand {
    Predict {
        submission: SubmissionId,
        request: TransactionRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Predict { .. } => "predict",
        }
    }
}
