use std::path::{
    Path,
    PathBuf,
};

use crate::core::MsnapError;

pub const TEMPLATES_DIR: &str = "templates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Voucher,
    CoverLetter,
    MailingLabel,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] =
        [TemplateKind::Voucher, TemplateKind::CoverLetter, TemplateKind::MailingLabel];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Voucher => "voucher_template.docx",
            TemplateKind::CoverLetter => "cover_letter_template.docx",
            TemplateKind::MailingLabel => "mailing_label_template.docx",
        }
    }

    /// Tag used in output filenames.
    pub fn code(self) -> &'static str {
        match self {
            TemplateKind::Voucher => "VOUCHER",
            TemplateKind::CoverLetter => "COVER",
            TemplateKind::MailingLabel => "LABEL",
        }
    }
}

/// Ordered list of directories searched for template files.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    search_dirs: Vec<PathBuf>,
}

impl TemplateLocator {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// `<install>/../templates`, then `<install>/templates`, where `<install>` is the
    /// directory holding the executable. A configured directory is tried before both.
    pub fn from_install_location(configured: Option<&Path>) -> Self {
        let mut search_dirs: Vec<PathBuf> = configured.map(Path::to_path_buf).into_iter().collect();

        let install_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(parent) = install_dir.parent() {
            search_dirs.push(parent.join(TEMPLATES_DIR));
        }
        search_dirs.push(install_dir.join(TEMPLATES_DIR));

        Self::new(search_dirs)
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn locate(&self, kind: TemplateKind) -> Result<PathBuf, MsnapError> {
        let candidates: Vec<PathBuf> =
            self.search_dirs.iter().map(|dir| dir.join(kind.file_name())).collect();

        match candidates.iter().find(|candidate| candidate.is_file()) {
            Some(found) => Ok(found.clone()),
            None => Err(MsnapError::TemplateMissing {
                name: kind.file_name().to_string(),
                searched: candidates,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_first_candidate_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("voucher_template.docx"), b"second").unwrap();

        let locator =
            TemplateLocator::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(
            locator.locate(TemplateKind::Voucher).unwrap(),
            second.path().join("voucher_template.docx")
        );

        fs::write(first.path().join("voucher_template.docx"), b"first").unwrap();
        assert_eq!(
            locator.locate(TemplateKind::Voucher).unwrap(),
            first.path().join("voucher_template.docx")
        );
    }

    #[test]
    fn test_missing_template_lists_searched_paths() {
        let dir = tempfile::tempdir().unwrap();
        let locator = TemplateLocator::new(vec![dir.path().to_path_buf()]);
        match locator.locate(TemplateKind::MailingLabel) {
            Err(MsnapError::TemplateMissing { name, searched }) => {
                assert_eq!(name, "mailing_label_template.docx");
                assert_eq!(searched, vec![dir.path().join("mailing_label_template.docx")]);
            }
            other => panic!("expected TemplateMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_install_location_has_two_candidates_after_configured() {
        let locator = TemplateLocator::from_install_location(Some(Path::new("/custom")));
        assert_eq!(locator.search_dirs()[0], PathBuf::from("/custom"));
        assert_eq!(locator.search_dirs().len(), 3);
        assert!(locator.search_dirs()[1..].iter().all(|dir| dir.ends_with(TEMPLATES_DIR)));
    }
}
