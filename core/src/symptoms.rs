//! Symptom sets and the categorised symptom vocabulary offered to intake.
//!
//! The engine itself accepts any free-text symptom name. The vocabulary is
//! what the presentation layer offers for selection and what the runner
//! draws synthetic cases from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An unordered, de-duplicated set of normalised (trimmed, lower-case) symptoms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSet(BTreeSet<String>);

impl SymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symptom. Blank names are ignored, repeats are no-ops.
    pub fn insert(&mut self, symptom: &str) -> bool {
        let normalised = normalise(symptom);
        if normalised.is_empty() {
            return false;
        }
        self.0.insert(normalised)
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.0.contains(&normalise(symptom))
    }

    pub fn contains_any<S: AsRef<str>>(&self, symptoms: &[S]) -> bool {
        symptoms.iter().any(|s| self.contains(s.as_ref()))
    }

    pub fn contains_all<S: AsRef<str>>(&self, symptoms: &[S]) -> bool {
        !symptoms.is_empty() && symptoms.iter().all(|s| self.contains(s.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for s in iter {
            set.insert(s.as_ref());
        }
        set
    }
}

fn normalise(symptom: &str) -> String {
    symptom.trim().to_lowercase()
}

/// One selectable group of symptoms.
#[derive(Debug, Clone, Copy)]
pub struct SymptomCategory {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
}

/// The categorised symptom vocabulary. A symptom may appear in more than
/// one category ("Chest pain" is both respiratory and cardiovascular).
pub const SYMPTOM_CATEGORIES: &[SymptomCategory] = &[
    SymptomCategory {
        name: "General",
        symptoms: &[
            "Fever", "Fatigue", "Weakness", "Loss of appetite", "Weight loss",
            "Night sweats", "Chills", "Malaise",
        ],
    },
    SymptomCategory {
        name: "Respiratory",
        symptoms: &[
            "Cough", "Shortness of breath", "Chest pain", "Wheezing",
            "Sore throat", "Runny nose", "Nasal congestion", "Difficulty breathing",
        ],
    },
    SymptomCategory {
        name: "Cardiovascular",
        symptoms: &[
            "Chest pain", "Heart palpitations", "Irregular heartbeat",
            "High blood pressure", "Low blood pressure", "Rapid heartbeat",
        ],
    },
    SymptomCategory {
        name: "Neurological",
        symptoms: &[
            "Severe headache", "Dizziness", "Confusion", "Seizure",
            "Memory loss", "Numbness", "Tingling", "Vision problems",
            "Loss of consciousness", "Difficulty speaking",
        ],
    },
    SymptomCategory {
        name: "Gastrointestinal",
        symptoms: &[
            "Nausea", "Vomiting", "Diarrhea", "Constipation",
            "Abdominal pain", "Bloating", "Loss of appetite", "Blood in stool",
        ],
    },
    SymptomCategory {
        name: "Musculoskeletal",
        symptoms: &[
            "Joint pain", "Muscle pain", "Back pain", "Neck pain",
            "Stiffness", "Swelling", "Limited mobility",
        ],
    },
    SymptomCategory {
        name: "Dermatological",
        symptoms: &[
            "Rash", "Itching", "Skin discoloration", "Bruising",
            "Hives", "Dry skin", "Skin lesions",
        ],
    },
    SymptomCategory {
        name: "Pediatric",
        symptoms: &[
            "Child fever", "Infant crying", "Poor feeding", "Developmental delay",
            "Irritability in child",
        ],
    },
    SymptomCategory {
        name: "Other",
        symptoms: &[
            "Allergic reaction", "Dehydration", "Insomnia",
            "Anxiety", "Depression", "Bleeding",
        ],
    },
];

/// Every distinct vocabulary symptom, in first-seen order.
pub fn all_symptoms() -> Vec<&'static str> {
    let mut seen = BTreeSet::new();
    SYMPTOM_CATEGORIES
        .iter()
        .flat_map(|c| c.symptoms.iter().copied())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

pub fn category(name: &str) -> Option<&'static SymptomCategory> {
    SYMPTOM_CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_insensitive_and_exact() {
        let set: SymptomSet = ["Chest Pain", "  fever "].into_iter().collect();
        assert!(set.contains("chest pain"));
        assert!(set.contains("FEVER"));
        assert!(!set.contains("chest"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn duplicates_and_blanks_are_no_ops() {
        let set: SymptomSet = ["cough", "Cough", "COUGH", "", "   "].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn vocabulary_deduplicates_shared_symptoms() {
        let all = all_symptoms();
        let chest = all.iter().filter(|s| s.eq_ignore_ascii_case("chest pain")).count();
        assert_eq!(chest, 1);
        assert!(category("neurological").is_some());
    }
}
