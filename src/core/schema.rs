//! Static description of the intake form: which sections exist, which fields each
//! section holds, and what a field may contain.

use std::fmt;

use crate::core::errors::MsnapError;

pub const RECIPIENT_TITLE: &str = "Recipient Information";
pub const PET_COUNT: usize = 3;

pub const YES_NO_NA: &[&str] = &["Yes", "No", "N/A"];
pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "N/A"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Label shown on screen and written to the spreadsheet dump.
    pub label: &'static str,
    /// Placeholder token used in document templates.
    pub token: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
}

impl FieldSpec {
    const fn text(label: &'static str, token: &'static str) -> Self {
        Self { label, token, kind: FieldKind::Text, default: "" }
    }

    const fn choice(
        label: &'static str,
        token: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self { label, token, kind: FieldKind::Choice(options), default }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }
}

pub const RECIPIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("First Name", "«First_Name»"),
    FieldSpec::text("Last Name", "«Last_Name»"),
    FieldSpec::text("Day phone(s)", "«Day_Phone»"),
    FieldSpec::text("Street, Apt # OR PO Box", "«Street»"),
    FieldSpec::text("City", "«City»"),
    FieldSpec::text("Zip", "«Zip»"),
    FieldSpec::choice("Within Morg city limits?", "«Within_City_Limits»", YES_NO_NA, "No"),
    FieldSpec::text("POB only: closest town", "«Closest_Town»"),
    FieldSpec::text("How did you hear about M-SNAP?", "«Referral»"),
    FieldSpec::text("Name on voucher", "«Name_on_Voucher»"),
];

pub const PET_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("Name", "«Pet_Name»"),
    FieldSpec::text("Species", "«Species»"),
    FieldSpec::choice("Gender", "«Gender»", GENDER_OPTIONS, "N/A"),
    FieldSpec::text("Breed", "«Breed»"),
    FieldSpec::text("Color(s)", "«Colors»"),
    FieldSpec::text("Distinguishing characteristic(s)", "«Distinguishing»"),
    FieldSpec::choice("Stray?", "«Stray»", YES_NO_NA, "N/A"),
    FieldSpec::choice("Older than 5 years?", "«Older_Than_5»", YES_NO_NA, "N/A"),
    FieldSpec::choice("Dog weight range?", "«Dog_Weight»", YES_NO_NA, "N/A"),
    FieldSpec::choice("Special", "«Special»", YES_NO_NA, "N/A"),
    FieldSpec::text("Voucher", "«Voucher»"),
    FieldSpec::text("Sent", "«Sent»"),
    FieldSpec::text("Expires", "«Expires»"),
    FieldSpec::text("Grant", "«Grant»"),
];

pub const DATE_TOKEN: &str = "«Date»";
pub const PET_NUMBER_TOKEN: &str = "«Pet_Number»";

/// One screen's worth of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Recipient,
    /// Zero-based pet slot.
    Pet(usize),
}

impl SectionId {
    pub const ALL: [SectionId; 1 + PET_COUNT] =
        [SectionId::Recipient, SectionId::Pet(0), SectionId::Pet(1), SectionId::Pet(2)];

    pub fn title(&self) -> String {
        match self {
            SectionId::Recipient => RECIPIENT_TITLE.to_string(),
            SectionId::Pet(slot) => format!("Pet {} Information", slot + 1),
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            SectionId::Recipient => RECIPIENT_FIELDS,
            SectionId::Pet(_) => PET_FIELDS,
        }
    }

    pub fn field(&self, label: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.label == label)
    }
}

/// A closed-choice value. Implementors only ever hold a member of their option list.
pub trait ChoiceValue {
    fn options(&self) -> &'static [&'static str];
    fn as_str(&self) -> &'static str;
    fn set_str(&mut self, value: &str) -> Result<(), MsnapError>;
}

macro_rules! closed_choice {
    ($name:ident, $field:literal, default = $default:ident, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Result<Self, MsnapError> {
                match value.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(MsnapError::InvalidChoice {
                        field: $field.to_string(),
                        value: other.to_string(),
                        allowed: vec![$($text),+],
                    }),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ChoiceValue for $name {
            fn options(&self) -> &'static [&'static str] {
                &[$($text),+]
            }

            fn as_str(&self) -> &'static str {
                self.label()
            }

            fn set_str(&mut self, value: &str) -> Result<(), MsnapError> {
                *self = $name::parse(value)?;
                Ok(())
            }
        }
    };
}

closed_choice!(YesNoNa, "Yes/No/N/A", default = NotApplicable, {
    Yes => "Yes",
    No => "No",
    NotApplicable => "N/A",
});

closed_choice!(Gender, "Gender", default = NotApplicable, {
    Male => "Male",
    Female => "Female",
    NotApplicable => "N/A",
});
