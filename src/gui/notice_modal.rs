use std::collections::VecDeque;

use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// Informational and warning messages, shown one at a time in arrival order.
pub struct NoticeModal {
    queue: VecDeque<Notice>,
}

impl NoticeModal {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(NoticeKind::Success, title.into(), message.into());
    }

    pub fn warning(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(NoticeKind::Warning, title.into(), message);
    }

    fn push(&mut self, kind: NoticeKind, title: String, message: String) {
        self.queue.push_back(Notice { kind, title, message });
    }

    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.queue.front() else {
            return;
        };

        let (icon, color) = match notice.kind {
            NoticeKind::Success => ("ℹ", egui::Color32::LIGHT_BLUE),
            NoticeKind::Warning => ("⚠", egui::Color32::YELLOW),
        };

        let modal = egui::Modal::new(egui::Id::new("notice_modal")).show(ctx, |ui| {
            ui.set_width(420.0);
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).size(24.0).color(color));
                ui.label(egui::RichText::new(&notice.title).size(16.0).strong());
            });

            ui.add_space(8.0);
            ui.label(egui::RichText::new(&notice.message).size(14.0));
            ui.add_space(15.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    ui.close();
                }
            });
        });

        if modal.should_close() {
            self.queue.pop_front();
        }
    }
}

impl Default for NoticeModal {
    fn default() -> Self {
        Self::new()
    }
}
