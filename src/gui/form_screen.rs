use eframe::egui;

use crate::core::{
    navigation,
    session::FieldSlot,
    Screen,
    Session,
    Step,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Back,
    Next,
}

/// Draws the current screen's fields and buttons. Returns the button pressed, if any.
pub fn show(ui: &mut egui::Ui, session: &mut Session, enabled: bool) -> Option<FormAction> {
    let screen = session.screen();
    let section = screen.section();

    ui.vertical_centered(|ui| {
        ui.heading(egui::RichText::new(section.title()).size(22.0).strong());
    });
    ui.add_space(16.0);

    ui.add_enabled_ui(enabled, |ui| {
        egui::Grid::new(("form_grid", screen.index()))
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for spec in section.fields() {
                    ui.label(spec.label);
                    match session.slot_mut(section, spec.label) {
                        Some(FieldSlot::Text(value)) => {
                            ui.add(egui::TextEdit::singleline(value).desired_width(260.0));
                        }
                        Some(FieldSlot::Choice(choice)) => {
                            let mut selected = choice.as_str();
                            egui::ComboBox::from_id_salt((spec.label, screen.index()))
                                .width(260.0)
                                .selected_text(selected)
                                .show_ui(ui, |ui| {
                                    for option in choice.options() {
                                        ui.selectable_value(&mut selected, *option, *option);
                                    }
                                });
                            if selected != choice.as_str() {
                                if let Err(e) = choice.set_str(selected) {
                                    tracing::warn!("{}", e);
                                }
                            }
                        }
                        None => {
                            ui.label("-");
                        }
                    }
                    ui.end_row();
                }
            });

        if let Some(flag) = session.flags.get_mut(screen) {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                ui.checkbox(flag, "Add another pet?");
            });
        }
    });

    ui.add_space(20.0);

    let next_label = match navigation::next(screen, session.flags) {
        Step::Show(_) => "Next",
        Step::Export => "Submit",
    };

    ui.vertical_centered(|ui| {
        ui.horizontal(|ui| {
            let mut action = None;
            let can_go_back = screen != Screen::Recipient;
            if can_go_back && ui.add_enabled(enabled, egui::Button::new("Back")).clicked() {
                action = Some(FormAction::Back);
            }
            if ui.add_enabled(enabled, egui::Button::new(next_label)).clicked() {
                action = Some(FormAction::Next);
            }
            action
        })
        .inner
    })
    .inner
}
