use eframe::egui;
use msnap::{
    core::AppConfig,
    gui::MsnapApp,
};

fn main() -> eframe::Result {
    msnap::init_tracing();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("M-SNAP Form")
            .with_inner_size([600.0, 720.0])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "M-SNAP Form",
        options,
        Box::new(|cc| Ok(Box::new(MsnapApp::new(cc, config)))),
    )
}
