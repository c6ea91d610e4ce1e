//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{HttpPredictionClient, PredictError, PredictionService};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Spawns the worker thread. Every predict command runs as its own task, so
/// submissions overlap and settle in completion order.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    client: HttpPredictionClient,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let reason = format!("backend worker startup failure: {err}");
                let _ = ui_tx.try_send(UiEvent::Info(reason.clone()));
                refuse_commands(&cmd_rx, &ui_tx, &reason);
                return;
            }
        };

        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Backend worker ready ({})",
            client.base_url()
        )));

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Predict {
                        submission,
                        request,
                    } => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = client.predict(&request).await;
                            let _ = ui_tx.send(UiEvent::PredictionSettled {
                                submission,
                                outcome,
                            });
                        });
                    }
                }
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    })
}

/// Settles every queued submission as unsent when no runtime is available.
fn refuse_commands(cmd_rx: &Receiver<BackendCommand>, ui_tx: &Sender<UiEvent>, reason: &str) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::Predict { submission, .. } => {
                let _ = ui_tx.send(UiEvent::PredictionSettled {
                    submission,
                    outcome: Err(PredictError::Unsent(reason.to_string())),
                });
            }
        }
    }
}
