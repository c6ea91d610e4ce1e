use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{load_settings, HttpPredictionClient};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::FraudCheckApp;

#[derive(Parser, Debug)]
struct Args {
    /// Settings file (defaults to ./fraud_check.toml, then the user config dir).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Prediction service base URL; overrides settings and environment.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    let client = HttpPredictionClient::new(&settings.api_base_url)?;
    tracing::info!(
        api = client.base_url(),
        validation = ?settings.validation,
        overlap = ?settings.overlap,
        "starting desktop GUI"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, client);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Credit Card Fraud Detection")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Credit Card Fraud Detection",
        options,
        Box::new(move |_cc| Ok(Box::new(FraudCheckApp::bootstrap(cmd_tx, ui_rx, &settings)))),
    )
    .map_err(|err| anyhow!("desktop GUI exited with error: {err}"))
}
