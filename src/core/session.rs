use std::borrow::Cow;

use super::{
    errors::MsnapError,
    navigation::{
        self,
        AddPetFlags,
        Screen,
        Step,
    },
    schema::{
        ChoiceValue,
        Gender,
        SectionId,
        YesNoNa,
        PET_COUNT,
    },
};

/// Mutable handle on one field, handed to the form screen.
pub enum FieldSlot<'a> {
    Text(&'a mut String),
    Choice(&'a mut dyn ChoiceValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientInfo {
    pub first_name: String,
    pub last_name: String,
    pub day_phone: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub within_city_limits: YesNoNa,
    pub closest_town: String,
    pub referral: String,
    pub name_on_voucher: String,
}

impl Default for RecipientInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            day_phone: String::new(),
            street: String::new(),
            city: String::new(),
            zip: String::new(),
            within_city_limits: YesNoNa::No,
            closest_town: String::new(),
            referral: String::new(),
            name_on_voucher: String::new(),
        }
    }
}

impl RecipientInfo {
    pub fn slot_mut(&mut self, label: &str) -> Option<FieldSlot<'_>> {
        let slot = match label {
            "First Name" => FieldSlot::Text(&mut self.first_name),
            "Last Name" => FieldSlot::Text(&mut self.last_name),
            "Day phone(s)" => FieldSlot::Text(&mut self.day_phone),
            "Street, Apt # OR PO Box" => FieldSlot::Text(&mut self.street),
            "City" => FieldSlot::Text(&mut self.city),
            "Zip" => FieldSlot::Text(&mut self.zip),
            "Within Morg city limits?" => FieldSlot::Choice(&mut self.within_city_limits),
            "POB only: closest town" => FieldSlot::Text(&mut self.closest_town),
            "How did you hear about M-SNAP?" => FieldSlot::Text(&mut self.referral),
            "Name on voucher" => FieldSlot::Text(&mut self.name_on_voucher),
            _ => return None,
        };
        Some(slot)
    }

    pub fn value(&self, label: &str) -> Option<Cow<'_, str>> {
        let value = match label {
            "First Name" => Cow::Borrowed(self.first_name.as_str()),
            "Last Name" => Cow::Borrowed(self.last_name.as_str()),
            "Day phone(s)" => Cow::Borrowed(self.day_phone.as_str()),
            "Street, Apt # OR PO Box" => Cow::Borrowed(self.street.as_str()),
            "City" => Cow::Borrowed(self.city.as_str()),
            "Zip" => Cow::Borrowed(self.zip.as_str()),
            "Within Morg city limits?" => Cow::Borrowed(self.within_city_limits.label()),
            "POB only: closest town" => Cow::Borrowed(self.closest_town.as_str()),
            "How did you hear about M-SNAP?" => Cow::Borrowed(self.referral.as_str()),
            "Name on voucher" => Cow::Borrowed(self.name_on_voucher.as_str()),
            _ => return None,
        };
        Some(value)
    }

    /// Last name used in output filenames.
    pub fn file_stem_name(&self) -> &str {
        let last = self.last_name.trim();
        if last.is_empty() {
            "Unknown"
        } else {
            last
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetInfo {
    pub name: String,
    pub species: String,
    pub gender: Gender,
    pub breed: String,
    pub colors: String,
    pub distinguishing: String,
    pub stray: YesNoNa,
    pub older_than_five: YesNoNa,
    pub dog_weight_range: YesNoNa,
    pub special: YesNoNa,
    pub voucher: String,
    pub sent: String,
    pub expires: String,
    pub grant: String,
}

impl PetInfo {
    pub fn slot_mut(&mut self, label: &str) -> Option<FieldSlot<'_>> {
        let slot = match label {
            "Name" => FieldSlot::Text(&mut self.name),
            "Species" => FieldSlot::Text(&mut self.species),
            "Gender" => FieldSlot::Choice(&mut self.gender),
            "Breed" => FieldSlot::Text(&mut self.breed),
            "Color(s)" => FieldSlot::Text(&mut self.colors),
            "Distinguishing characteristic(s)" => FieldSlot::Text(&mut self.distinguishing),
            "Stray?" => FieldSlot::Choice(&mut self.stray),
            "Older than 5 years?" => FieldSlot::Choice(&mut self.older_than_five),
            "Dog weight range?" => FieldSlot::Choice(&mut self.dog_weight_range),
            "Special" => FieldSlot::Choice(&mut self.special),
            "Voucher" => FieldSlot::Text(&mut self.voucher),
            "Sent" => FieldSlot::Text(&mut self.sent),
            "Expires" => FieldSlot::Text(&mut self.expires),
            "Grant" => FieldSlot::Text(&mut self.grant),
            _ => return None,
        };
        Some(slot)
    }

    pub fn value(&self, label: &str) -> Option<Cow<'_, str>> {
        let value = match label {
            "Name" => Cow::Borrowed(self.name.as_str()),
            "Species" => Cow::Borrowed(self.species.as_str()),
            "Gender" => Cow::Borrowed(self.gender.label()),
            "Breed" => Cow::Borrowed(self.breed.as_str()),
            "Color(s)" => Cow::Borrowed(self.colors.as_str()),
            "Distinguishing characteristic(s)" => Cow::Borrowed(self.distinguishing.as_str()),
            "Stray?" => Cow::Borrowed(self.stray.label()),
            "Older than 5 years?" => Cow::Borrowed(self.older_than_five.label()),
            "Dog weight range?" => Cow::Borrowed(self.dog_weight_range.label()),
            "Special" => Cow::Borrowed(self.special.label()),
            "Voucher" => Cow::Borrowed(self.voucher.as_str()),
            "Sent" => Cow::Borrowed(self.sent.as_str()),
            "Expires" => Cow::Borrowed(self.expires.as_str()),
            "Grant" => Cow::Borrowed(self.grant.as_str()),
            _ => return None,
        };
        Some(value)
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Everything the operator has typed so far, plus where they are in the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub recipient: RecipientInfo,
    pub pets: [PetInfo; PET_COUNT],
    pub flags: AddPetFlags,
    screen: Screen,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Applies "Next" (or "Submit") to the current screen. When the result is
    /// `Step::Export` the cursor stays put; the caller runs the export.
    pub fn advance(&mut self) -> Step {
        let step = navigation::next(self.screen, self.flags);
        if let Step::Show(screen) = step {
            self.screen = screen;
        }
        step
    }

    pub fn go_back(&mut self) {
        self.screen = navigation::back(self.screen);
    }

    /// Restores all defaults and returns to the first screen.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn slot_mut(&mut self, section: SectionId, label: &str) -> Option<FieldSlot<'_>> {
        match section {
            SectionId::Recipient => self.recipient.slot_mut(label),
            SectionId::Pet(slot) => self.pets.get_mut(slot)?.slot_mut(label),
        }
    }

    pub fn value(&self, section: SectionId, label: &str) -> Option<Cow<'_, str>> {
        match section {
            SectionId::Recipient => self.recipient.value(label),
            SectionId::Pet(slot) => self.pets.get(slot)?.value(label),
        }
    }

    /// Assigns a field from text. Closed-choice fields reject values outside their set.
    pub fn set(&mut self, section: SectionId, label: &str, value: &str) -> Result<(), MsnapError> {
        let unknown = || MsnapError::UnknownField {
            section: section.title(),
            field: label.to_string(),
        };
        match self.slot_mut(section, label).ok_or_else(unknown)? {
            FieldSlot::Text(text) => {
                *text = value.to_string();
                Ok(())
            }
            FieldSlot::Choice(choice) => choice.set_str(value).map_err(|_| {
                MsnapError::InvalidChoice {
                    field: label.to_string(),
                    value: value.to_string(),
                    allowed: choice.options().to_vec(),
                }
            }),
        }
    }

    /// Sections the operator can currently reach, in order.
    pub fn active_sections(&self) -> Vec<SectionId> {
        let mut sections = vec![SectionId::Recipient];
        sections.extend((0..self.flags.active_pet_count()).map(SectionId::Pet));
        sections
    }

    /// Reachable pets that will produce documents and tracker rows, renumbered from 1.
    pub fn exported_pets(&self) -> Vec<(usize, &PetInfo)> {
        self.pets
            .iter()
            .take(self.flags.active_pet_count())
            .filter(|pet| pet.has_name())
            .enumerate()
            .map(|(index, pet)| (index + 1, pet))
            .collect()
    }
}
