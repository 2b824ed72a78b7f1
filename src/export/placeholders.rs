use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::{
    schema::{
        DATE_TOKEN,
        PET_FIELDS,
        PET_NUMBER_TOKEN,
        RECIPIENT_FIELDS,
    },
    MsnapError,
    PetInfo,
    RecipientInfo,
};

/// Token -> replacement text for one pet's documents.
#[derive(Debug, Clone)]
pub struct PlaceholderMap {
    values: HashMap<String, String>,
    pattern: Option<Regex>,
}

impl PlaceholderMap {
    pub fn new(values: HashMap<String, String>) -> Result<Self, MsnapError> {
        let mut tokens: Vec<&String> = values.keys().filter(|token| !token.is_empty()).collect();
        // Longest first so a token that prefixes another never wins the alternation.
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation =
            tokens.iter().map(|token| regex::escape(token)).collect::<Vec<_>>().join("|");
        let pattern = if alternation.is_empty() { None } else { Some(Regex::new(&alternation)?) };

        Ok(Self { values, pattern })
    }

    pub fn for_pet(
        recipient: &RecipientInfo,
        pet: &PetInfo,
        pet_number: usize,
        date: NaiveDate,
    ) -> Result<Self, MsnapError> {
        let mut values = HashMap::new();
        for spec in RECIPIENT_FIELDS {
            let value = recipient.value(spec.label).unwrap_or_default();
            values.insert(spec.token.to_string(), value.into_owned());
        }
        for spec in PET_FIELDS {
            let value = pet.value(spec.label).unwrap_or_default();
            values.insert(spec.token.to_string(), value.into_owned());
        }
        values.insert(DATE_TOKEN.to_string(), date.format("%m/%d/%Y").to_string());
        values.insert(PET_NUMBER_TOKEN.to_string(), pet_number.to_string());

        Self::new(values)
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    /// Replaces every token occurrence in a single left-to-right pass. Replacement
    /// text is never rescanned.
    pub fn substitute(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |captures: &regex::Captures| {
                self.values.get(&captures[0]).cloned().unwrap_or_else(|| captures[0].to_string())
            })
            .into_owned()
    }

    pub fn contains_token(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|pattern| pattern.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Gender;

    fn map(pairs: &[(&str, &str)]) -> PlaceholderMap {
        PlaceholderMap::new(
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let map = map(&[("«Pet_Name»", "Rex"), ("«City»", "Morgantown")]);
        assert_eq!(
            map.substitute("«Pet_Name» of «City», called «Pet_Name»"),
            "Rex of Morgantown, called Rex"
        );
        assert_eq!(map.substitute("no tokens here"), "no tokens here");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let map = map(&[("«A»", "«B»"), ("«B»", "b")]);
        assert_eq!(map.substitute("«A» «B»"), "«B» b");
    }

    #[test]
    fn test_idempotent_when_values_hold_no_tokens() {
        let map = map(&[("«Pet_Name»", "Rex"), ("«Species»", "Dog")]);
        let once = map.substitute("Dear owner of «Pet_Name» the «Species».");
        assert_eq!(map.substitute(&once), once);
    }

    #[test]
    fn test_longer_token_wins() {
        let map = map(&[("«Name»", "short"), ("«Name»_full", "long")]);
        assert_eq!(map.substitute("«Name»_full «Name»"), "long short");
    }

    #[test]
    fn test_empty_map_matches_nothing() {
        let map = map(&[]);
        assert!(!map.contains_token("«Pet_Name»"));
        assert_eq!(map.substitute("«Pet_Name»"), "«Pet_Name»");
    }

    #[test]
    fn test_for_pet_resolves_recipient_and_pet_fields() {
        let recipient = RecipientInfo {
            first_name: "Jane".to_string(),
            city: "Morgantown".to_string(),
            ..Default::default()
        };
        let pet = PetInfo { name: "Rex".to_string(), gender: Gender::Male, ..Default::default() };
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        let map = PlaceholderMap::for_pet(&recipient, &pet, 2, date).unwrap();
        assert_eq!(map.get("«First_Name»"), Some("Jane"));
        assert_eq!(map.get("«Pet_Name»"), Some("Rex"));
        assert_eq!(map.get("«Gender»"), Some("Male"));
        assert_eq!(map.get("«Stray»"), Some("N/A"));
        assert_eq!(map.get("«Within_City_Limits»"), Some("No"));
        assert_eq!(map.get("«Date»"), Some("03/07/2024"));
        assert_eq!(map.get("«Pet_Number»"), Some("2"));
    }
}
