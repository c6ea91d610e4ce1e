//! Text printed by the `predict` and `health` commands.

use anyhow::{bail, Result};
use client_core::SubmissionStatus;
use shared::protocol::{HealthStatus, ResultVariant};

/// Output for a settled `predict`. A failed submission becomes an error
/// carrying the generic failure message.
pub fn verdict(status: &SubmissionStatus, json: bool) -> Result<String> {
    match status {
        SubmissionStatus::Succeeded(result) if json => Ok(serde_json::to_string_pretty(result)?),
        SubmissionStatus::Succeeded(_) => match status.result_panel() {
            Some(panel) => {
                let marker = match panel.variant {
                    ResultVariant::Fraud => "[FRAUD]",
                    ResultVariant::NotFraud => "[OK]",
                };
                Ok(format!("{marker} {}\n{}", panel.verdict, panel.probability_line))
            }
            None => bail!("submission did not settle"),
        },
        SubmissionStatus::Failed(message) => bail!("{message}"),
        SubmissionStatus::Editing | SubmissionStatus::Submitting => {
            bail!("submission did not settle")
        }
    }
}

pub fn health(health: &HealthStatus) -> String {
    format!("{}: {}", health.status, health.message)
}
