use std::path::Path;

use crate::core::{
    MsnapError,
    Session,
};

pub const DUMP_SHEET_TITLE: &str = "M-SNAP Form Data";

/// Writes every reachable section as a header row followed by label/value rows,
/// with one blank row between sections.
pub fn write_form_dump(session: &Session, path: &Path) -> Result<(), MsnapError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(DUMP_SHEET_TITLE)
        .map_err(|e| MsnapError::Spreadsheet(e.to_string()))?;

    let mut row: u32 = 1;
    for section in session.active_sections() {
        sheet.get_cell_mut((1, row)).set_value_string(section.title());
        row += 1;
        for spec in section.fields() {
            let value = session.value(section, spec.label).unwrap_or_default();
            sheet.get_cell_mut((1, row)).set_value_string(spec.label);
            sheet.get_cell_mut((2, row)).set_value_string(value.as_ref());
            row += 1;
        }
        row += 1;
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)?;
    tracing::info!("Form data written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{
        PET_FIELDS,
        RECIPIENT_FIELDS,
    };

    #[test]
    fn test_dump_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.xlsx");

        let mut session = Session::new();
        session.recipient.first_name = "Jane".to_string();
        session.pets[0].name = "Rex".to_string();
        write_form_dump(&session, &path).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name(DUMP_SHEET_TITLE).unwrap();
        let cell = |col: u32, row: u32| sheet.get_value((col, row));

        assert_eq!(cell(1, 1), "Recipient Information");
        assert_eq!(cell(1, 2), "First Name");
        assert_eq!(cell(2, 2), "Jane");

        let pet_header = 2 + RECIPIENT_FIELDS.len() as u32 + 1;
        assert_eq!(cell(1, pet_header - 1), "");
        assert_eq!(cell(1, pet_header), "Pet 1 Information");
        assert_eq!(cell(2, pet_header + 1), "Rex");
        assert_eq!(cell(2, pet_header + 3), "N/A");

        let after_pet = pet_header + PET_FIELDS.len() as u32 + 2;
        assert_eq!(cell(1, after_pet), "");
    }
}
