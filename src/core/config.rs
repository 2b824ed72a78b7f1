use std::{
    collections::BTreeMap,
    path::PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::schema::Gender;
use crate::persistence::{
    load_json_or_default,
    save_json,
};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_TRACKER_SHEET: &str = "Vouchers";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracker_path: PathBuf,
    pub tracker_sheet: String,
    pub templates_dir: Option<PathBuf>,
    /// Gender label -> code written to the tracker. Unmapped labels write an empty cell.
    pub gender_codes: BTreeMap<String, String>,
    pub last_output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut gender_codes = BTreeMap::new();
        gender_codes.insert(Gender::Male.label().to_string(), "N".to_string());
        gender_codes.insert(Gender::Female.label().to_string(), "S".to_string());

        Self {
            tracker_path: default_tracker_path(),
            tracker_sheet: DEFAULT_TRACKER_SHEET.to_string(),
            templates_dir: None,
            gender_codes,
            last_output_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        load_json_or_default::<AppConfig>(CONFIG_FILE)
    }

    pub fn save(&self) {
        if let Err(e) = save_json(self, CONFIG_FILE) {
            tracing::warn!("Failed to save {}: {}", CONFIG_FILE, e);
        }
    }

    pub fn gender_code(&self, gender: Gender) -> &str {
        self.gender_codes.get(gender.label()).map(String::as_str).unwrap_or("")
    }
}

fn default_tracker_path() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("M-SNAP")
        .join("Voucher Tracker.xlsm")
}
