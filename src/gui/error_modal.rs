use eframe::egui;

use crate::core::MsnapError;

#[derive(Default, Clone)]
pub struct ErrorData {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorData {
    /// Operator-facing wording for a failed step.
    pub fn from_error(step: &str, error: &MsnapError) -> Self {
        let message = match error.cause() {
            MsnapError::ExportAborted(reason) => {
                format!("Nothing was saved because {}.", reason)
            }
            MsnapError::TemplateMissing { name, .. } => format!(
                "The document template '{}' could not be found. Place it in the templates folder and submit again.",
                name
            ),
            MsnapError::InvalidChoice { field, value, .. } => {
                format!("'{}' is not a valid choice for {}.", value, field)
            }
            other => other.to_string(),
        };

        Self { title: format!("{} failed", step), message, details: Some(format!("{:?}", error)) }
    }
}

pub struct ErrorModal {
    open: bool,
    data: ErrorData,
}

impl ErrorModal {
    pub fn new() -> Self {
        Self { open: false, data: ErrorData::default() }
    }

    pub fn report(&mut self, step: &str, error: &MsnapError) {
        tracing::error!("{} failed: {}", step, error);
        self.data = ErrorData::from_error(step, error);
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("error_modal")).show(ctx, |ui| {
            ui.set_width(450.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("⚠").size(24.0).color(egui::Color32::RED));
                ui.label(egui::RichText::new(&self.data.title).size(18.0).strong());
            });

            ui.add_space(10.0);
            ui.label(egui::RichText::new(&self.data.message).size(14.0));

            if let Some(details) = &self.data.details {
                ui.add_space(10.0);
                ui.collapsing("Technical Details", |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut details.as_str())
                            .desired_width(f32::INFINITY)
                            .desired_rows(4)
                            .code_editor(),
                    );
                });
            }

            ui.add_space(15.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    ui.close();
                }
            });
        });

        if modal.should_close() {
            self.open = false;
            self.data = ErrorData::default();
        }
    }
}

impl Default for ErrorModal {
    fn default() -> Self {
        Self::new()
    }
}
