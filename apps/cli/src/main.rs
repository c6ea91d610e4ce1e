use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, FormController, HttpPredictionClient, OverlapPolicy, ValidationMode};
use shared::domain::FieldName;
use tracing_subscriber::EnvFilter;

mod input;
mod render;

#[derive(Parser, Debug)]
#[command(name = "fraud-check", about = "Check a card transaction against the fraud prediction service")]
struct Cli {
    /// Settings file (defaults to ./fraud_check.toml, then the user config dir).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Prediction service base URL; overrides settings and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one transaction and print the verdict.
    Predict {
        /// JSON object with field values.
        #[arg(long)]
        input: Option<PathBuf>,
        /// NAME=VALUE, repeatable; applied after --input.
        #[arg(long = "field", value_parser = input::parse_assignment)]
        fields: Vec<(FieldName, String)>,
        /// Refuse to send non-numeric fields.
        #[arg(long)]
        strict: bool,
        /// Print the service response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Probe the prediction service's root endpoint.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    let client = HttpPredictionClient::new(&settings.api_base_url)?;

    match cli.command {
        Command::Predict {
            input,
            fields,
            strict,
            json,
        } => {
            let validation = if strict {
                ValidationMode::Strict
            } else {
                settings.validation
            };
            let mut controller = FormController::new(validation, OverlapPolicy::SingleFlight);
            if let Some(path) = input {
                input::load_json_file(controller.form_mut(), &path)?;
            }
            for (field, value) in fields {
                controller.on_field_change(field, value);
            }

            let status = controller
                .submit_with(&client)
                .await
                .context("transaction not submitted")?;
            println!("{}", render::verdict(status, json)?);
        }
        Command::Health => {
            let health = client
                .health()
                .await
                .with_context(|| format!("prediction service at {} is unreachable", client.base_url()))?;
            println!("{}", render::health(&health));
        }
    }

    Ok(())
}
