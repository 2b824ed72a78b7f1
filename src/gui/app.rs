use eframe::egui;

use super::{
    error_modal::ErrorModal,
    form_screen::{
        self,
        FormAction,
    },
    message_overlay::MessageOverlay,
    notice_modal::NoticeModal,
    prompts::DialogPrompts,
    settings_modal::SettingsModal,
};
use crate::{
    core::{
        AppConfig,
        Screen,
        Session,
        Step,
    },
    export::{
        self,
        ExportContext,
        ExportReport,
        ExportStep,
        TemplateLocator,
    },
};

pub struct Modals {
    pub error: ErrorModal,
    pub notice: NoticeModal,
    pub settings: SettingsModal,
}

impl Default for Modals {
    fn default() -> Self {
        Self { error: ErrorModal::new(), notice: NoticeModal::new(), settings: SettingsModal::new() }
    }
}

impl Modals {
    fn any_open(&self) -> bool {
        self.error.is_open() || self.notice.is_open() || self.settings.is_open()
    }
}

pub struct MsnapApp {
    session: Session,
    config: AppConfig,
    modals: Modals,
    message_overlay: MessageOverlay,
    // Set on the frame Submit is pressed; the export runs on the following frame so the
    // overlay is already on screen while it blocks.
    pending_submit: bool,
}

impl MsnapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        cc.egui_ctx.set_zoom_factor(1.1);
        cc.egui_ctx.set_theme(egui::Theme::Light);

        Self {
            session: Session::new(),
            config,
            modals: Modals::default(),
            message_overlay: MessageOverlay::new(),
            pending_submit: false,
        }
    }

    fn handle_form_action(&mut self, action: FormAction, ctx: &egui::Context) {
        match action {
            FormAction::Back => self.session.go_back(),
            FormAction::Next => match self.session.advance() {
                Step::Show(screen) => tracing::debug!("Showing {:?}", screen),
                Step::Export => {
                    self.message_overlay.set_message("Saving voucher packet...");
                    self.pending_submit = true;
                    ctx.request_repaint();
                }
            },
        }
    }

    fn run_pending_export(&mut self) {
        self.pending_submit = false;

        let templates = TemplateLocator::from_install_location(self.config.templates_dir.as_deref());
        let export_ctx = ExportContext {
            config: &self.config,
            templates: &templates,
            date: chrono::Local::now().date_naive(),
        };

        let result = export::export_and_reset(&mut self.session, &export_ctx, &mut DialogPrompts);
        self.message_overlay.clear_message();

        match result {
            Ok(report) => {
                self.remember_choices(&report);
                self.modals.notice.success(
                    "Voucher packet saved",
                    format!(
                        "Saved {} document(s) and the form data to:\n{}",
                        report.documents.len(),
                        report.destination.display()
                    ),
                );
                for warning in report.warnings() {
                    self.modals.notice.warning("Tracker not updated", warning);
                }
            }
            Err(e) => {
                let step = e.step().map_or("Export", ExportStep::label);
                self.modals.error.report(step, e.cause());
            }
        }
    }

    fn remember_choices(&mut self, report: &ExportReport) {
        let mut changed = false;

        if self.config.last_output_dir.as_deref() != Some(report.output_base.as_path()) {
            self.config.last_output_dir = Some(report.output_base.clone());
            changed = true;
        }
        if let Some(path) = report.tracker_path() {
            if path != self.config.tracker_path {
                self.config.tracker_path = path.to_path_buf();
                changed = true;
            }
        }

        if changed {
            self.config.save();
        }
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.modals.settings.open(&self.config);
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }

    fn show_status(&self, ctx: &egui::Context) {
        let screen = self.session.screen();
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(format!("Screen {} of {}", screen.index() + 1, Screen::ALL.len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(format!("Tracker: {}", self.config.tracker_path.display()));
                });
            });
        });
    }
}

impl eframe::App for MsnapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pending_submit {
            self.run_pending_export();
        }

        self.show_menu(ctx);
        self.show_status(ctx);

        let enabled = !self.message_overlay.is_active() && !self.modals.any_open();
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| form_screen::show(ui, &mut self.session, enabled))
                    .inner
            })
            .inner;

        if let Some(action) = action {
            self.handle_form_action(action, ctx);
        }

        if let Some(config) = self.modals.settings.show(ctx) {
            self.config = config;
            self.config.save();
        }

        self.message_overlay.show(ctx);
        self.modals.error.show(ctx);
        self.modals.notice.show(ctx);
    }
}
