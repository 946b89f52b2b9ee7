//! Symptom classifier: a first-match decision list over the rule catalog.
//!
//! Rules are evaluated top-down and the first one that fires decides the
//! whole result. No rule is scored against another. When nothing fires the
//! catalog's fallback outcome is returned.
//!
//! Callers must reject empty symptom sets before classifying
//! (see `intake::validate_intake`).

use crate::{
    catalog::{RuleCatalog, TriageOutcome},
    symptoms::SymptomSet,
    types::Urgency,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub urgency: Urgency,
    pub priority: u8,
    pub specialty: String,
    pub disease: String,
    pub doctor: String,
    pub color: String,
}

impl From<&TriageOutcome> for DiagnosisResult {
    fn from(o: &TriageOutcome) -> Self {
        Self {
            urgency: o.urgency,
            priority: o.priority,
            specialty: o.specialty.clone(),
            disease: o.disease.clone(),
            doctor: o.doctor.clone(),
            color: o.color.clone(),
        }
    }
}

/// A diagnosis plus the name of the rule that produced it (None = fallback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub diagnosis: DiagnosisResult,
    pub matched_rule: Option<String>,
}

pub struct Classifier {
    catalog: RuleCatalog,
}

impl Classifier {
    pub fn new(catalog: RuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn classify(&self, symptoms: &SymptomSet, age: u32) -> DiagnosisResult {
        self.explain(symptoms, age).diagnosis
    }

    /// Classify and report which rule fired.
    pub fn explain(&self, symptoms: &SymptomSet, age: u32) -> Classification {
        match self.catalog.first_match(symptoms, age) {
            Some(rule) => {
                log::debug!("rule '{}' fired for age={age} symptoms={symptoms:?}", rule.name);
                Classification {
                    diagnosis: DiagnosisResult::from(&rule.outcome),
                    matched_rule: Some(rule.name.clone()),
                }
            }
            None => {
                log::debug!("no rule fired for age={age}, using fallback");
                Classification {
                    diagnosis: DiagnosisResult::from(&self.catalog.fallback),
                    matched_rule: None,
                }
            }
        }
    }
}
