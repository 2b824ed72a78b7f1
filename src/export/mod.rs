pub mod docx;
pub mod naming;
pub mod placeholders;
pub mod templates;
pub mod tracker;
pub mod workbook;

use std::{
    fmt,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use chrono::NaiveDate;
pub use placeholders::PlaceholderMap;
pub use templates::{
    TemplateKind,
    TemplateLocator,
};
use tracker::TrackerRow;

use crate::core::{
    AppConfig,
    MsnapError,
    Session,
};

/// The operator-facing pickers the export needs. The GUI backs this with native
/// dialogs; tests script the answers.
pub trait OperatorPrompts {
    /// Base directory for the output folder. `None` means the operator declined.
    fn choose_output_dir(&mut self, suggested: Option<&Path>) -> Option<PathBuf>;

    /// Called only when the configured tracker workbook does not exist.
    fn choose_tracker(&mut self, missing: &Path) -> Option<PathBuf>;
}

/// The fatal stages of an export, named in operator-facing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStep {
    Destination,
    Spreadsheet,
    Documents,
}

impl ExportStep {
    pub fn label(self) -> &'static str {
        match self {
            ExportStep::Destination => "Output folder",
            ExportStep::Spreadsheet => "Spreadsheet",
            ExportStep::Documents => "Document generation",
        }
    }

    pub fn attach(self, error: impl Into<MsnapError>) -> MsnapError {
        MsnapError::Step { step: self, source: Box::new(error.into()) }
    }
}

impl fmt::Display for ExportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct ExportContext<'a> {
    pub config: &'a AppConfig,
    pub templates: &'a TemplateLocator,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerOutcome {
    Appended { path: PathBuf, rows: Vec<u32> },
    /// No pet had a name, so there was nothing to record.
    NothingToAppend,
    Skipped(String),
    Failed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub output_base: PathBuf,
    pub destination: PathBuf,
    pub spreadsheet: PathBuf,
    pub documents: Vec<PathBuf>,
    pub tracker: TrackerOutcome,
}

impl ExportReport {
    /// Non-fatal problems the operator should hear about.
    pub fn warnings(&self) -> Vec<String> {
        match &self.tracker {
            TrackerOutcome::Skipped(reason) => {
                vec![format!("Voucher tracker was not updated: {}", reason)]
            }
            TrackerOutcome::Failed { path, reason } => vec![format!(
                "Could not update the voucher tracker at {}:\n{}",
                path.display(),
                reason
            )],
            TrackerOutcome::Appended { .. } | TrackerOutcome::NothingToAppend => Vec::new(),
        }
    }

    /// Tracker path the operator picked, when it differs from the configured one.
    pub fn tracker_path(&self) -> Option<&Path> {
        match &self.tracker {
            TrackerOutcome::Appended { path, .. } | TrackerOutcome::Failed { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Runs the export steps in order: destination folder, spreadsheet dump, per-pet
/// documents, tracker append. Declining the folder picker aborts before any file is
/// touched. A missing template stops the export with an error. Fatal errors carry the
/// `ExportStep` they were raised in. Tracker problems are reported in the returned
/// report and never undo the files already written.
pub fn run_export(
    session: &Session,
    ctx: &ExportContext<'_>,
    prompts: &mut dyn OperatorPrompts,
) -> Result<ExportReport, MsnapError> {
    let recipient = &session.recipient;

    let output_base =
        prompts.choose_output_dir(ctx.config.last_output_dir.as_deref()).ok_or_else(|| {
            ExportStep::Destination
                .attach(MsnapError::ExportAborted("no output folder was selected".to_string()))
        })?;

    let destination = output_base.join(naming::destination_folder_name(recipient, ctx.date));
    fs::create_dir_all(&destination).map_err(|e| ExportStep::Destination.attach(e))?;
    tracing::info!("Exporting to {}", destination.display());

    let spreadsheet = destination.join(naming::spreadsheet_file_name(recipient, ctx.date));
    workbook::write_form_dump(session, &spreadsheet)
        .map_err(|e| ExportStep::Spreadsheet.attach(e))?;

    let documents = write_documents(session, ctx, &destination)
        .map_err(|e| ExportStep::Documents.attach(e))?;

    let tracker = update_tracker(session, ctx, prompts);

    Ok(ExportReport { output_base, destination, spreadsheet, documents, tracker })
}

/// Runs the export and, unless it failed outright, resets the session to a blank form.
pub fn export_and_reset(
    session: &mut Session,
    ctx: &ExportContext<'_>,
    prompts: &mut dyn OperatorPrompts,
) -> Result<ExportReport, MsnapError> {
    let report = run_export(session, ctx, prompts)?;
    session.reset();
    Ok(report)
}

fn write_documents(
    session: &Session,
    ctx: &ExportContext<'_>,
    destination: &Path,
) -> Result<Vec<PathBuf>, MsnapError> {
    let recipient = &session.recipient;
    let mut documents = Vec::new();

    for (pet_number, pet) in session.exported_pets() {
        let map = PlaceholderMap::for_pet(recipient, pet, pet_number, ctx.date)?;

        for kind in TemplateKind::ALL {
            let template = ctx.templates.locate(kind).inspect_err(|e| {
                tracing::error!("Cannot generate documents for pet {}: {}", pet_number, e)
            })?;
            let output = destination.join(naming::document_file_name(
                recipient,
                ctx.date,
                kind.code(),
                pet_number,
            ));
            docx::fill_template(&template, &output, &map)?;
            documents.push(output);
        }

        tracing::info!("Generated documents for pet {} ({})", pet_number, pet.name.trim());
    }

    Ok(documents)
}

fn update_tracker(
    session: &Session,
    ctx: &ExportContext<'_>,
    prompts: &mut dyn OperatorPrompts,
) -> TrackerOutcome {
    let rows: Vec<TrackerRow> = session
        .exported_pets()
        .into_iter()
        .map(|(_, pet)| TrackerRow::from_pet(&session.recipient, pet, ctx.date, ctx.config))
        .collect();

    if rows.is_empty() {
        tracing::info!("No named pets; tracker left unchanged");
        return TrackerOutcome::NothingToAppend;
    }

    let path = if ctx.config.tracker_path.is_file() {
        ctx.config.tracker_path.clone()
    } else {
        tracing::warn!("Tracker not found at {}", ctx.config.tracker_path.display());
        match prompts.choose_tracker(&ctx.config.tracker_path) {
            Some(path) => path,
            None => {
                return TrackerOutcome::Skipped("tracker selection was cancelled".to_string());
            }
        }
    };

    match tracker::append_rows(&path, &ctx.config.tracker_sheet, &rows) {
        Ok(rows) => TrackerOutcome::Appended { path, rows },
        Err(e) => {
            tracing::warn!("Tracker update failed for {}: {}", path.display(), e);
            TrackerOutcome::Failed { path, reason: e.to_string() }
        }
    }
}
