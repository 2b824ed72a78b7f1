use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportStep;

#[derive(Error, Debug)]
pub enum MsnapError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Zip error: {0}")]
    Zip(Box<zip::result::ZipError>),

    #[error("XML error: {0}")]
    Xml(Box<quick_xml::Error>),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Export cancelled: {0}")]
    ExportAborted(String),

    #[error("Template missing: {name} (searched {searched:?})")]
    TemplateMissing { name: String, searched: Vec<PathBuf> },

    #[error("'{value}' is not an allowed value for {field} (expected one of {allowed:?})")]
    InvalidChoice { field: String, value: String, allowed: Vec<&'static str> },

    #[error("Unknown field '{field}' in {section}")]
    UnknownField { section: String, field: String },

    #[error("Tracker error: {0}")]
    Tracker(String),

    #[error("{step} failed: {source}")]
    Step { step: ExportStep, source: Box<MsnapError> },
}

impl MsnapError {
    /// Export step the error was raised in, if it came out of the export pipeline.
    pub fn step(&self) -> Option<ExportStep> {
        match self {
            MsnapError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The underlying error with any step context removed.
    pub fn cause(&self) -> &MsnapError {
        match self {
            MsnapError::Step { source, .. } => source.cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for MsnapError {
    fn from(error: std::io::Error) -> Self {
        MsnapError::Io(Box::new(error))
    }
}

impl From<zip::result::ZipError> for MsnapError {
    fn from(error: zip::result::ZipError) -> Self {
        MsnapError::Zip(Box::new(error))
    }
}

impl From<quick_xml::Error> for MsnapError {
    fn from(error: quick_xml::Error) -> Self {
        MsnapError::Xml(Box::new(error))
    }
}

impl From<umya_spreadsheet::XlsxError> for MsnapError {
    fn from(error: umya_spreadsheet::XlsxError) -> Self {
        MsnapError::Spreadsheet(error.to_string())
    }
}
