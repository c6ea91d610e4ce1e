use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::panels;
use client_core::{FormController, PredictError, Settings, Submission, SubmitRejected};

pub struct FraudCheckApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    controller: FormController,
    api_base_url: String,

    status: String,
    rejection: Option<SubmitRejected>,
}

impl FraudCheckApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &Settings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller: FormController::new(settings.validation, settings.overlap),
            api_base_url: settings.api_base_url.clone(),
            status: "Starting".to_string(),
            rejection: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::PredictionSettled {
                    submission,
                    outcome,
                } => {
                    self.controller.complete_submit(submission, outcome);
                }
            }
        }
    }

    fn try_submit(&mut self) {
        match self.controller.begin_submit() {
            Ok(Submission { id, request }) => {
                self.rejection = None;
                let cmd = BackendCommand::Predict {
                    submission: id,
                    request,
                };
                if let Err(reason) = dispatch_backend_command(&self.cmd_tx, cmd) {
                    self.status = reason.clone();
                    self.controller
                        .complete_submit(id, Err(PredictError::Unsent(reason)));
                }
            }
            Err(rejected) => {
                tracing::warn!(reason = %rejected, "submission refused");
                self.rejection = Some(rejected);
            }
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Credit Card Fraud Detection");
            ui.weak("Enter transaction details to check for fraud.");
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Service:");
                ui.small(egui::RichText::new(&self.api_base_url).weak());
                ui.separator();
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
                if self.controller.in_flight() > 1 {
                    ui.separator();
                    ui.small(format!("{} requests in flight", self.controller.in_flight()));
                }
            });
        });
    }

    fn show_workspace(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let input = panels::transaction_form(ui, self.controller.form());
                    for (field, raw) in input.edits {
                        self.controller.on_field_change(field, raw);
                    }

                    ui.add_space(12.0);

                    let status = self.controller.status();
                    let button = egui::Button::new(
                        egui::RichText::new(status.submit_label()).strong().size(16.0),
                    )
                    .min_size(egui::vec2(220.0, 36.0));
                    let submit_enabled = status.submit_enabled();
                    let clicked = ui.add_enabled(submit_enabled, button).clicked();

                    if clicked || (input.submit_requested && submit_enabled) {
                        self.try_submit();
                    }

                    if let Some(rejected) = &self.rejection {
                        ui.add_space(6.0);
                        panels::rejection_notice(ui, rejected);
                    }

                    ui.add_space(12.0);
                    let status = self.controller.status();
                    if let Some(panel) = status.error_panel() {
                        panels::error_panel(ui, &panel);
                    }
                    if let Some(panel) = status.result_panel() {
                        panels::result_panel(ui, &panel);
                    }
                });
        });
    }
}

impl eframe::App for FraudCheckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_status_bar(ctx);
        self.show_workspace(ctx);

        if self.controller.in_flight() > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
