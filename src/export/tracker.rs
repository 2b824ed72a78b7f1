use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use chrono::NaiveDate;
use umya_spreadsheet::Worksheet;

use crate::core::{
    AppConfig,
    MsnapError,
    PetInfo,
    RecipientInfo,
};

/// Columns scanned for emptiness and written per voucher.
pub const TRACKER_COLUMNS: u32 = 15;
/// Rows the tracker workbook keeps for its own use; never written.
pub const RESERVED_ROWS: [u32; 2] = [32, 33];

/// One voucher line in the tracker, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerRow {
    pub date: String,
    pub voucher: String,
    pub first_name: String,
    pub last_name: String,
    pub pet_name: String,
    pub city: String,
    pub zip: String,
    pub species: String,
    pub gender_code: String,
    pub stray: String,
    pub phone: String,
    pub referral: String,
    pub breed: String,
    pub expires: String,
    pub grant: String,
}

impl TrackerRow {
    pub fn from_pet(
        recipient: &RecipientInfo,
        pet: &PetInfo,
        date: NaiveDate,
        config: &AppConfig,
    ) -> Self {
        Self {
            date: date.format("%m/%d/%Y").to_string(),
            voucher: pet.voucher.clone(),
            first_name: recipient.first_name.clone(),
            last_name: recipient.last_name.clone(),
            pet_name: pet.name.clone(),
            city: recipient.city.clone(),
            zip: recipient.zip.clone(),
            species: pet.species.clone(),
            gender_code: config.gender_code(pet.gender).to_string(),
            stray: pet.stray.label().to_string(),
            phone: recipient.day_phone.clone(),
            referral: recipient.referral.clone(),
            breed: pet.breed.clone(),
            expires: pet.expires.clone(),
            grant: pet.grant.clone(),
        }
    }

    pub fn cells(&self) -> [&str; TRACKER_COLUMNS as usize] {
        [
            &self.date,
            &self.voucher,
            &self.first_name,
            &self.last_name,
            &self.pet_name,
            &self.city,
            &self.zip,
            &self.species,
            &self.gender_code,
            &self.stray,
            &self.phone,
            &self.referral,
            &self.breed,
            &self.expires,
            &self.grant,
        ]
    }
}

pub fn is_reserved(row: u32) -> bool {
    RESERVED_ROWS.contains(&row)
}

fn is_row_empty(sheet: &Worksheet, row: u32) -> bool {
    (1..=TRACKER_COLUMNS).all(|col| sheet.get_value((col, row)).trim().is_empty())
}

/// First row at or below `from` whose tracked columns are all blank, skipping reserved rows.
pub fn first_free_row(sheet: &Worksheet, from: u32) -> u32 {
    let mut row = from.max(1);
    while is_reserved(row) || !is_row_empty(sheet, row) {
        row += 1;
    }
    row
}

/// Writes `rows` into the first free rows of `sheet`. Returns the row numbers used.
pub fn write_rows(sheet: &mut Worksheet, rows: &[TrackerRow]) -> Vec<u32> {
    let mut written = Vec::with_capacity(rows.len());
    let mut cursor = 1;

    for row in rows {
        cursor = first_free_row(sheet, cursor);
        for (col, value) in (1..=TRACKER_COLUMNS).zip(row.cells()) {
            sheet.get_cell_mut((col, cursor)).set_value_string(value);
        }
        written.push(cursor);
        cursor += 1;
    }

    written
}

/// Appends `rows` to the tracker at `path` and saves it in place. The workbook is
/// written to a sibling file first and renamed over the original, so a failed save
/// leaves the original intact. Macro content is carried over by the reader/writer.
pub fn append_rows(
    path: &Path,
    preferred_sheet: &str,
    rows: &[TrackerRow],
) -> Result<Vec<u32>, MsnapError> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path)?;

    let has_preferred = book.get_sheet_by_name(preferred_sheet).is_some();
    let sheet = if has_preferred {
        book.get_sheet_by_name_mut(preferred_sheet).ok_or_else(|| {
            MsnapError::Tracker(format!("sheet '{}' disappeared", preferred_sheet))
        })?
    } else {
        tracing::warn!("Tracker has no '{}' sheet; using the active sheet", preferred_sheet);
        book.get_active_sheet_mut()
    };

    let written = write_rows(sheet, rows);

    let staging = staging_path(path);
    if let Err(e) = umya_spreadsheet::writer::xlsx::write(&book, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    tracing::info!("Appended tracker rows {:?} to {}", written, path.display());
    Ok(written)
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("~msnap_{}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Gender;

    fn row(name: &str) -> TrackerRow {
        let recipient = RecipientInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            ..Default::default()
        };
        let pet = PetInfo { name: name.to_string(), gender: Gender::Female, ..Default::default() };
        TrackerRow::from_pet(
            &recipient,
            &pet,
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            &AppConfig::default(),
        )
    }

    fn sheet_with_rows(filled: impl IntoIterator<Item = u32>) -> umya_spreadsheet::Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_active_sheet_mut();
        for r in filled {
            sheet.get_cell_mut((3, r)).set_value_string("taken");
        }
        book
    }

    #[test]
    fn test_row_mapping() {
        let row = row("Rex");
        let cells = row.cells();
        assert_eq!(cells[0], "03/07/2024");
        assert_eq!(cells[2], "Jane");
        assert_eq!(cells[3], "Doe");
        assert_eq!(cells[4], "Rex");
        assert_eq!(cells[8], "S");
        assert_eq!(cells[9], "N/A");
    }

    #[test]
    fn test_first_free_row_skips_filled_rows() {
        let mut book = sheet_with_rows(1..=5);
        let sheet = book.get_active_sheet_mut();
        assert_eq!(first_free_row(sheet, 1), 6);

        sheet.get_cell_mut((15, 6)).set_value_string("last column");
        assert_eq!(first_free_row(sheet, 1), 7);
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut book = sheet_with_rows(1..=2);
        let sheet = book.get_active_sheet_mut();
        sheet.get_cell_mut((1, 3)).set_value_string("   ");
        assert_eq!(first_free_row(sheet, 1), 3);
    }

    #[test]
    fn test_reserved_rows_are_never_written() {
        let mut book = sheet_with_rows(1..=30);
        let sheet = book.get_active_sheet_mut();

        let rows: Vec<TrackerRow> = ["A", "B", "C"].iter().map(|n| row(n)).collect();
        let written = write_rows(sheet, &rows);

        assert_eq!(written, vec![31, 34, 35]);
        assert_eq!(sheet.get_value((5, 31)), "A");
        assert_eq!(sheet.get_value((5, 32)), "");
        assert_eq!(sheet.get_value((5, 33)), "");
        assert_eq!(sheet.get_value((5, 34)), "B");
    }

    #[test]
    fn test_empty_reserved_rows_are_skipped_even_when_first() {
        let mut book = sheet_with_rows(1..=31);
        let sheet = book.get_active_sheet_mut();
        assert_eq!(first_free_row(sheet, 1), 34);
    }

    #[test]
    fn test_later_rows_skip_occupied_gaps() {
        let mut book = sheet_with_rows((1..=3).chain(5..=6));
        let sheet = book.get_active_sheet_mut();

        let written = write_rows(sheet, &[row("A"), row("B")]);
        assert_eq!(written, vec![4, 7]);
    }

    #[test]
    fn test_append_rows_prefers_named_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let vouchers = book.new_sheet("Vouchers").unwrap();
        vouchers.get_cell_mut((1, 1)).set_value_string("Date");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let written = append_rows(&path, "Vouchers", &[row("Rex")]).unwrap();
        assert_eq!(written, vec![2]);

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        assert_eq!(book.get_sheet_by_name("Vouchers").unwrap().get_value((5, 2)), "Rex");
        assert_eq!(book.get_sheet_by_name("Sheet1").unwrap().get_value((5, 1)), "");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_append_rows_keeps_vba_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Voucher Tracker.xlsm");
        let vba = b"macro project bytes 01".to_vec();

        let mut book = umya_spreadsheet::new_file();
        book.new_sheet("Vouchers").unwrap();
        book.set_macros_code(vba.clone());
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        assert_eq!(append_rows(&path, "Vouchers", &[row("Rex")]).unwrap(), vec![1]);

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        assert!(book.get_has_macros());
        assert_eq!(book.get_macros_code().map(|code| code.len()), Some(vba.len()));
        assert_eq!(book.get_sheet_by_name("Vouchers").unwrap().get_value((5, 1)), "Rex");

        let mut archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        assert!(archive.by_name("xl/vbaProject.bin").is_ok());
    }

    #[test]
    fn test_append_rows_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xlsm");
        assert!(append_rows(&path, "Vouchers", &[row("Rex")]).is_err());
        assert!(!path.exists());
    }
}
