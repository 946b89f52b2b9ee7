//! Reference data for the desk: triage rules, doctors, rooms, beds and the
//! roster policy. Everything here is immutable once loaded.

use crate::{
    symptoms::SymptomSet,
    types::{Gender, Urgency},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One condition that can fire a triage rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleTrigger {
    /// At least one of the listed symptoms is present.
    AnySymptom { symptoms: Vec<String> },
    /// Every listed symptom is present.
    AllSymptoms { symptoms: Vec<String> },
    /// Patient is strictly younger than `age`.
    AgeBelow { age: u32 },
}

impl RuleTrigger {
    pub fn matches(&self, symptoms: &SymptomSet, age: u32) -> bool {
        match self {
            Self::AnySymptom { symptoms: wanted } => symptoms.contains_any(wanted),
            Self::AllSymptoms { symptoms: wanted } => symptoms.contains_all(wanted),
            Self::AgeBelow { age: limit } => age < *limit,
        }
    }
}

/// What a rule assigns when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub urgency: Urgency,
    pub priority: u8,
    pub specialty: String,
    pub disease: String,
    pub doctor: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRule {
    pub name: String,
    /// Any-of: the rule fires when one trigger matches.
    pub triggers: Vec<RuleTrigger>,
    pub outcome: TriageOutcome,
}

impl TriageRule {
    pub fn matches(&self, symptoms: &SymptomSet, age: u32) -> bool {
        self.triggers.iter().any(|t| t.matches(symptoms, age))
    }
}

/// Ordered first-match decision list plus the outcome used when nothing fires.
/// Order is clinical behaviour: swapping two rules changes triage results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub rules: Vec<TriageRule>,
    pub fallback: TriageOutcome,
}

impl RuleCatalog {
    /// First rule that fires, if any.
    pub fn first_match(&self, symptoms: &SymptomSet, age: u32) -> Option<&TriageRule> {
        self.rules.iter().find(|r| r.matches(symptoms, age))
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &TriageOutcome> {
        self.rules
            .iter()
            .map(|r| &r.outcome)
            .chain(std::iter::once(&self.fallback))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub name: String,
    pub specialty: String,
    pub hourly_cost: f64,
    #[serde(default)]
    pub contact: Option<String>,
}

/// Specialty → consulting room, with a generic fallback room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTable {
    pub rooms: HashMap<String, String>,
    pub default_room: String,
}

impl RoomTable {
    pub fn room_for(&self, specialty: &str) -> &str {
        self.rooms
            .get(specialty)
            .map(String::as_str)
            .unwrap_or(&self.default_room)
    }
}

/// Eligibility partition of the bed pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedCategory {
    /// Critical care.
    Emergency,
    /// Gender-partitioned ward beds plus isolation.
    General,
    Pediatric,
}

impl BedCategory {
    pub const ALL: [BedCategory; 3] = [Self::Emergency, Self::General, Self::Pediatric];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::General => "general",
            Self::Pediatric => "pediatric",
        }
    }
}

/// Static description of one bed as loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedSpec {
    pub id: String,
    pub ward: String,
    pub bed_type: String,
    pub category: BedCategory,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Availability at load time.
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Parameters of the weekly round-robin roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPolicy {
    pub days: Vec<String>,
    pub shifts: Vec<String>,
    pub min_patients: u32,
    pub max_patients: u32,
    pub revenue_per_patient: f64,
    /// cost = patients * hourly_cost / cost_divisor
    pub cost_divisor: f64,
}
