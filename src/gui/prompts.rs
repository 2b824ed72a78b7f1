use std::path::{
    Path,
    PathBuf,
};

use rfd::FileDialog;

use crate::export::OperatorPrompts;

/// Native folder and file pickers.
pub struct DialogPrompts;

impl OperatorPrompts for DialogPrompts {
    fn choose_output_dir(&mut self, suggested: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = FileDialog::new().set_title("Choose where to save the voucher packet");
        if let Some(dir) = suggested.filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }

    fn choose_tracker(&mut self, missing: &Path) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title(format!("Voucher tracker not found at {} - select it", missing.display()))
            .add_filter("Excel macro workbook", &["xlsm"])
            .add_filter("Excel workbook", &["xlsx"]);
        if let Some(dir) = missing.parent().filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }
}

pub fn pick_templates_dir(current: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Choose the templates folder");
    if let Some(dir) = current.filter(|dir| dir.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_folder()
}

pub fn pick_tracker_file() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Choose the voucher tracker workbook")
        .add_filter("Excel macro workbook", &["xlsm"])
        .add_filter("Excel workbook", &["xlsx"])
        .pick_file()
}
