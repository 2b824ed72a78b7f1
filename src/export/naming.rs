use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::RecipientInfo;

const UNKNOWN_NAME: &str = "Unknown";

/// Strips characters that Windows refuses in file and folder names.
pub fn sanitize_component(raw: &str) -> String {
    static INVALID: OnceLock<Option<Regex>> = OnceLock::new();
    let cleaned = match INVALID.get_or_init(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).ok()) {
        Some(re) => re.replace_all(raw.trim(), "").into_owned(),
        None => raw.trim().to_string(),
    };
    cleaned.trim_end_matches(['.', ' ']).to_string()
}

/// `{first}{last}_{MMDDYYYY}`, or `Unknown_{MMDDYYYY}` when both names are blank.
pub fn destination_folder_name(recipient: &RecipientInfo, date: NaiveDate) -> String {
    let name = format!(
        "{}{}",
        sanitize_component(&recipient.first_name),
        sanitize_component(&recipient.last_name)
    );
    format!("{}_{}", or_unknown(name), date.format("%m%d%Y"))
}

/// `{last}_{YYYY-MM-DD}.xlsx`
pub fn spreadsheet_file_name(recipient: &RecipientInfo, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", stem(recipient), date.format("%Y-%m-%d"))
}

/// `{last}_{MMDDYYYY}_{KIND}_{n}.docx`
pub fn document_file_name(
    recipient: &RecipientInfo,
    date: NaiveDate,
    kind: &str,
    pet_number: usize,
) -> String {
    format!("{}_{}_{}_{}.docx", stem(recipient), date.format("%m%d%Y"), kind, pet_number)
}

fn stem(recipient: &RecipientInfo) -> String {
    or_unknown(sanitize_component(recipient.file_stem_name()))
}

fn or_unknown(cleaned: String) -> String {
    if cleaned.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane_doe() -> RecipientInfo {
        RecipientInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            ..Default::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_file_names() {
        let recipient = jane_doe();
        assert_eq!(destination_folder_name(&recipient, date()), "JaneDoe_03072024");
        assert_eq!(spreadsheet_file_name(&recipient, date()), "Doe_2024-03-07.xlsx");
        assert_eq!(
            document_file_name(&recipient, date(), "VOUCHER", 2),
            "Doe_03072024_VOUCHER_2.docx"
        );
    }

    #[test]
    fn test_invalid_characters_are_removed() {
        assert_eq!(sanitize_component(" O'Neil/Smith? "), "O'NeilSmith");
        assert_eq!(sanitize_component("trailing."), "trailing");

        let recipient = RecipientInfo { last_name: "<>".to_string(), ..Default::default() };
        assert_eq!(spreadsheet_file_name(&recipient, date()), "Unknown_2024-03-07.xlsx");
    }

    #[test]
    fn test_blank_names_fall_back_for_the_folder() {
        let blank = RecipientInfo::default();
        assert_eq!(destination_folder_name(&blank, date()), "Unknown_03072024");

        let unusable = RecipientInfo {
            first_name: "??".to_string(),
            last_name: " / ".to_string(),
            ..Default::default()
        };
        assert_eq!(destination_folder_name(&unusable, date()), "Unknown_03072024");

        let first_only = RecipientInfo { first_name: "Jane".to_string(), ..Default::default() };
        assert_eq!(destination_folder_name(&first_only, date()), "Jane_03072024");
    }
}
