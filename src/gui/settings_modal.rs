use std::path::PathBuf;

use eframe::egui;

use super::{
    modal::{
        action_buttons,
        Modal,
        ModalConfig,
        ModalResult,
    },
    prompts,
};
use crate::core::{
    schema::Gender,
    AppConfig,
};

/// Editable text copy of the settings the operator can change.
#[derive(Clone, Default)]
pub struct SettingsDraft {
    base: AppConfig,
    tracker_path: String,
    tracker_sheet: String,
    templates_dir: String,
    male_code: String,
    female_code: String,
}

impl SettingsDraft {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base: config.clone(),
            tracker_path: config.tracker_path.display().to_string(),
            tracker_sheet: config.tracker_sheet.clone(),
            templates_dir: config
                .templates_dir
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default(),
            male_code: config.gender_code(Gender::Male).to_string(),
            female_code: config.gender_code(Gender::Female).to_string(),
        }
    }

    pub fn into_config(self) -> AppConfig {
        let mut config = self.base;
        config.tracker_path = PathBuf::from(self.tracker_path.trim());
        let sheet = self.tracker_sheet.trim();
        if !sheet.is_empty() {
            config.tracker_sheet = sheet.to_string();
        }
        let templates = self.templates_dir.trim();
        config.templates_dir = (!templates.is_empty()).then(|| PathBuf::from(templates));
        set_code(&mut config, Gender::Male, &self.male_code);
        set_code(&mut config, Gender::Female, &self.female_code);
        config
    }
}

fn set_code(config: &mut AppConfig, gender: Gender, code: &str) {
    let code = code.trim();
    if code.is_empty() {
        config.gender_codes.remove(gender.label());
    } else {
        config.gender_codes.insert(gender.label().to_string(), code.to_string());
    }
}

pub struct SettingsModal {
    modal: Modal<SettingsDraft>,
}

impl SettingsModal {
    pub fn new() -> Self {
        let config = ModalConfig {
            fixed_size: Some(egui::Vec2::new(520.0, 260.0)),
            ..Default::default()
        };
        Self { modal: Modal::new_with_data("Settings", SettingsDraft::default()).with_config(config) }
    }

    pub fn open(&mut self, config: &AppConfig) {
        self.modal.open_with(SettingsDraft::from_config(config));
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<AppConfig> {
        let result = self.modal.show(ctx, |ui, draft| {
            egui::Grid::new("settings_grid").num_columns(3).spacing([8.0, 8.0]).show(ui, |ui| {
                ui.label("Voucher tracker");
                ui.add(egui::TextEdit::singleline(&mut draft.tracker_path).desired_width(300.0));
                if ui.button("Browse").clicked() {
                    if let Some(path) = prompts::pick_tracker_file() {
                        draft.tracker_path = path.display().to_string();
                    }
                }
                ui.end_row();

                ui.label("Tracker sheet");
                ui.add(egui::TextEdit::singleline(&mut draft.tracker_sheet).desired_width(300.0));
                ui.end_row();

                ui.label("Templates folder");
                ui.add(
                    egui::TextEdit::singleline(&mut draft.templates_dir)
                        .hint_text("next to the program")
                        .desired_width(300.0),
                );
                if ui.button("Browse").clicked() {
                    let current = PathBuf::from(draft.templates_dir.trim());
                    if let Some(dir) = prompts::pick_templates_dir(Some(&current)) {
                        draft.templates_dir = dir.display().to_string();
                    }
                }
                ui.end_row();

                ui.label("Tracker code: Male");
                ui.add(egui::TextEdit::singleline(&mut draft.male_code).desired_width(60.0));
                ui.end_row();

                ui.label("Tracker code: Female");
                ui.add(egui::TextEdit::singleline(&mut draft.female_code).desired_width(60.0));
                ui.end_row();
            });

            ui.add_space(12.0);
            action_buttons(ui, draft, "Save", "Cancel")
        })?;

        match result {
            ModalResult::Confirmed(draft) => Some(draft.into_config()),
            ModalResult::Cancelled => None,
        }
    }
}

impl Default for SettingsModal {
    fn default() -> Self {
        Self::new()
    }
}
