use super::schema::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Recipient,
    Pet1,
    Pet2,
    Pet3,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Recipient, Screen::Pet1, Screen::Pet2, Screen::Pet3];

    pub fn index(self) -> usize {
        match self {
            Screen::Recipient => 0,
            Screen::Pet1 => 1,
            Screen::Pet2 => 2,
            Screen::Pet3 => 3,
        }
    }

    pub fn section(self) -> SectionId {
        match self {
            Screen::Recipient => SectionId::Recipient,
            Screen::Pet1 => SectionId::Pet(0),
            Screen::Pet2 => SectionId::Pet(1),
            Screen::Pet3 => SectionId::Pet(2),
        }
    }

    /// Whether this screen shows the "Add another pet?" checkbox.
    pub fn has_add_pet_flag(self) -> bool {
        matches!(self, Screen::Pet1 | Screen::Pet2)
    }
}

/// The two "Add another pet?" checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddPetFlags {
    pub after_pet1: bool,
    pub after_pet2: bool,
}

impl AddPetFlags {
    pub fn get_mut(&mut self, screen: Screen) -> Option<&mut bool> {
        match screen {
            Screen::Pet1 => Some(&mut self.after_pet1),
            Screen::Pet2 => Some(&mut self.after_pet2),
            _ => None,
        }
    }

    /// Number of pet screens the operator can reach with these flags.
    pub fn active_pet_count(&self) -> usize {
        match (self.after_pet1, self.after_pet2) {
            (false, _) => 1,
            (true, false) => 2,
            (true, true) => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Show(Screen),
    Export,
}

pub fn next(screen: Screen, flags: AddPetFlags) -> Step {
    match screen {
        Screen::Recipient => Step::Show(Screen::Pet1),
        Screen::Pet1 if flags.after_pet1 => Step::Show(Screen::Pet2),
        Screen::Pet2 if flags.after_pet2 => Step::Show(Screen::Pet3),
        Screen::Pet1 | Screen::Pet2 | Screen::Pet3 => Step::Export,
    }
}

pub fn back(screen: Screen) -> Screen {
    match screen {
        Screen::Recipient | Screen::Pet1 => Screen::Recipient,
        Screen::Pet2 => Screen::Pet1,
        Screen::Pet3 => Screen::Pet2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FLAGS: [AddPetFlags; 4] = [
        AddPetFlags { after_pet1: false, after_pet2: false },
        AddPetFlags { after_pet1: true, after_pet2: false },
        AddPetFlags { after_pet1: false, after_pet2: true },
        AddPetFlags { after_pet1: true, after_pet2: true },
    ];

    #[test]
    fn test_recipient_never_exports() {
        for flags in ALL_FLAGS {
            assert_eq!(next(Screen::Recipient, flags), Step::Show(Screen::Pet1));
        }
    }

    #[test]
    fn test_pet_flags_skip_to_export() {
        for flags in ALL_FLAGS {
            let expected_pet1 =
                if flags.after_pet1 { Step::Show(Screen::Pet2) } else { Step::Export };
            let expected_pet2 =
                if flags.after_pet2 { Step::Show(Screen::Pet3) } else { Step::Export };
            assert_eq!(next(Screen::Pet1, flags), expected_pet1);
            assert_eq!(next(Screen::Pet2, flags), expected_pet2);
            assert_eq!(next(Screen::Pet3, flags), Step::Export);
        }
    }

    #[test]
    fn test_forward_moves_are_adjacent() {
        for flags in ALL_FLAGS {
            for screen in Screen::ALL {
                if let Step::Show(target) = next(screen, flags) {
                    assert_eq!(target.index(), screen.index() + 1);
                }
            }
        }
    }

    #[test]
    fn test_back_moves_one_screen() {
        assert_eq!(back(Screen::Recipient), Screen::Recipient);
        for screen in Screen::ALL.into_iter().skip(1) {
            assert_eq!(back(screen).index(), screen.index() - 1);
        }
    }

    #[test]
    fn test_active_pet_count() {
        let counts: Vec<usize> = ALL_FLAGS.iter().map(|f| f.active_pet_count()).collect();
        assert_eq!(counts, vec![1, 2, 1, 3]);
    }
}
