//! Form grid and outcome panels.

use client_core::{ErrorPanel, ResultPanel, SubmitRejected};
use eframe::egui;
use shared::{
    domain::{coerce_field_value, FieldName, FormState},
    protocol::ResultVariant,
};

const FORM_COLUMNS: usize = 4;
const FIELD_WIDTH: f32 = 130.0;

const FRAUD_ACCENT: egui::Color32 = egui::Color32::from_rgb(0xe5, 0x48, 0x4d);
const FRAUD_FILL: egui::Color32 = egui::Color32::from_rgb(0x4a, 0x1c, 0x1f);
const NOT_FRAUD_ACCENT: egui::Color32 = egui::Color32::from_rgb(0x3b, 0xa5, 0x5d);
const NOT_FRAUD_FILL: egui::Color32 = egui::Color32::from_rgb(0x1b, 0x3a, 0x26);

#[derive(Debug, Default)]
pub struct FormInput {
    pub edits: Vec<(FieldName, String)>,
    pub submit_requested: bool,
}

fn variant_colors(variant: ResultVariant) -> (egui::Color32, egui::Color32) {
    match variant {
        ResultVariant::Fraud => (FRAUD_FILL, FRAUD_ACCENT),
        ResultVariant::NotFraud => (NOT_FRAUD_FILL, NOT_FRAUD_ACCENT),
    }
}

/// Draws every input. Text that is present but not numeric gets a red label.
pub fn transaction_form(ui: &mut egui::Ui, form: &FormState) -> FormInput {
    let mut input = FormInput::default();

    egui::Grid::new("transaction_form_grid")
        .num_columns(FORM_COLUMNS * 2)
        .spacing(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            for (idx, field) in FieldName::form_order().enumerate() {
                let raw = form.get(field);
                let malformed = !raw.trim().is_empty() && coerce_field_value(raw).is_nan();
                let mut label = egui::RichText::new(field.as_str());
                if malformed {
                    label = label.color(ui.visuals().error_fg_color);
                }
                ui.label(label);

                let mut buf = raw.to_string();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut buf)
                        .hint_text(field.as_str())
                        .desired_width(FIELD_WIDTH),
                );
                if response.changed() {
                    input.edits.push((field, buf));
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    input.submit_requested = true;
                }

                if (idx + 1) % FORM_COLUMNS == 0 {
                    ui.end_row();
                }
            }
        });

    input
}

pub fn result_panel(ui: &mut egui::Ui, panel: &ResultPanel<'_>) {
    let (fill, accent) = variant_colors(panel.variant);
    egui::Frame::NONE
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, accent))
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Prediction Result").strong().size(18.0));
            ui.label(
                egui::RichText::new(panel.verdict)
                    .strong()
                    .size(24.0)
                    .color(accent),
            );
            ui.label(panel.probability_line.as_str());
        });
}

pub fn error_panel(ui: &mut egui::Ui, panel: &ErrorPanel<'_>) {
    let color = ui.visuals().error_fg_color;
    egui::Frame::NONE
        .fill(color.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(panel.message).color(color));
        });
}

pub fn rejection_notice(ui: &mut egui::Ui, rejected: &SubmitRejected) {
    ui.colored_label(
        ui.visuals().warn_fg_color,
        format!("Not submitted: {rejected}"),
    );
}
