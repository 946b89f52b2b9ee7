use crate::{
    catalog::{
        BedCategory, BedSpec, DoctorProfile, RoomTable, RosterPolicy, RuleCatalog, RuleTrigger,
        TriageOutcome, TriageRule,
    },
    types::{Gender, Urgency},
};
use serde::{de::DeserializeOwned, Deserialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
struct DoctorsFile {
    doctors: Vec<DoctorProfile>,
}

#[derive(Debug, Clone, Deserialize)]
struct BedsFile {
    beds: Vec<BedSpec>,
}

/// All reference data the engine needs, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub rules: RuleCatalog,
    pub doctors: Vec<DoctorProfile>,
    pub rooms: RoomTable,
    pub beds: Vec<BedSpec>,
    pub roster: RosterPolicy,
}

impl CatalogConfig {
    /// Load from the data/ directory.
    /// In tests, use CatalogConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let rules: RuleCatalog = read_json(&format!("{data_dir}/triage/rules.json"))?;
        let doctors: DoctorsFile = read_json(&format!("{data_dir}/staff/doctors.json"))?;
        let rooms: RoomTable = read_json(&format!("{data_dir}/facility/rooms.json"))?;
        let beds: BedsFile = read_json(&format!("{data_dir}/facility/beds.json"))?;
        let roster: RosterPolicy = read_json(&format!("{data_dir}/roster/roster_policy.json"))?;

        let config = Self {
            rules,
            doctors: doctors.doctors,
            rooms,
            beds: beds.beds,
            roster,
        };
        config.validate()?;
        log::info!(
            "Loaded catalog from {data_dir}: {} rules, {} doctors, {} beds",
            config.rules.rules.len(),
            config.doctors.len(),
            config.beds.len(),
        );
        Ok(config)
    }

    /// Reject catalogs the engine cannot honour.
    pub fn validate(&self) -> anyhow::Result<()> {
        for outcome in self.rules.outcomes() {
            if outcome.priority > 10 {
                anyhow::bail!(
                    "Priority {} for '{}' is outside 0..=10",
                    outcome.priority,
                    outcome.disease
                );
            }
        }
        if self.doctors.is_empty() {
            anyhow::bail!("Doctor catalog is empty");
        }
        if self.roster.days.is_empty() || self.roster.shifts.is_empty() {
            anyhow::bail!("Roster policy needs at least one day and one shift");
        }
        if self.roster.min_patients > self.roster.max_patients {
            anyhow::bail!(
                "Roster patient range {}..={} is empty",
                self.roster.min_patients,
                self.roster.max_patients
            );
        }
        if self.roster.cost_divisor <= 0.0 {
            anyhow::bail!("Roster cost divisor must be positive");
        }
        let mut seen = HashMap::new();
        for bed in &self.beds {
            if let Some(prev) = seen.insert(bed.id.as_str(), bed.category) {
                anyhow::bail!("Bed id {} listed twice ({:?})", bed.id, prev);
            }
        }
        Ok(())
    }

    /// Catalog with hardcoded defaults, identical to the shipped data/ files.
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
            doctors: builtin_doctors(),
            rooms: builtin_rooms(),
            beds: builtin_beds(),
            roster: builtin_roster_policy(),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}

fn any_of(symptoms: &[&str]) -> RuleTrigger {
    RuleTrigger::AnySymptom {
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
    }
}

fn all_of(symptoms: &[&str]) -> RuleTrigger {
    RuleTrigger::AllSymptoms {
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
    }
}

fn outcome(
    urgency: Urgency,
    priority: u8,
    specialty: &str,
    disease: &str,
    doctor: &str,
    color: &str,
) -> TriageOutcome {
    TriageOutcome {
        urgency,
        priority,
        specialty: specialty.into(),
        disease: disease.into(),
        doctor: doctor.into(),
        color: color.into(),
    }
}

fn rule(name: &str, triggers: Vec<RuleTrigger>, outcome: TriageOutcome) -> TriageRule {
    TriageRule {
        name: name.into(),
        triggers,
        outcome,
    }
}

fn builtin_rules() -> RuleCatalog {
    use Urgency::*;
    RuleCatalog {
        rules: vec![
            rule(
                "cardiac_emergency",
                vec![any_of(&["chest pain", "heart palpitations", "heart attack"])],
                outcome(Emergency, 10, "Cardiology", "Possible Cardiac Event",
                    "Dr. Sarah Johnson", "#ef4444"),
            ),
            rule(
                "respiratory_distress",
                vec![any_of(&["difficulty breathing", "shortness of breath", "wheezing"])],
                outcome(Emergency, 9, "Respiratory Medicine", "Acute Respiratory Distress",
                    "Dr. Sarah Johnson", "#ef4444"),
            ),
            rule(
                "neurological",
                vec![any_of(&["severe headache", "dizziness", "confusion", "seizure"])],
                outcome(High, 8, "Neurology", "Neurological Concern",
                    "Dr. Michael Chen", "#f97316"),
            ),
            rule(
                "pediatric",
                vec![RuleTrigger::AgeBelow { age: 18 }, any_of(&["child", "infant", "baby"])],
                outcome(Medium, 6, "Pediatrics", "Pediatric Consultation",
                    "Dr. Robert Lee", "#3b82f6"),
            ),
            rule(
                "respiratory_infection",
                vec![all_of(&["fever", "cough"])],
                outcome(Medium, 5, "General Medicine", "Respiratory Infection",
                    "Dr. Emily Davis", "#eab308"),
            ),
            rule(
                "gastrointestinal",
                vec![any_of(&["abdominal pain", "blood in stool", "vomiting"])],
                outcome(High, 7, "Gastroenterology", "Gastrointestinal Disorder",
                    "Dr. Michael Chen", "#f97316"),
            ),
            rule(
                "musculoskeletal",
                vec![any_of(&["joint pain", "back pain", "limited mobility", "stiffness"])],
                outcome(Medium, 5, "Orthopedics", "Musculoskeletal Issue",
                    "Dr. Anna Martinez", "#8b5cf6"),
            ),
            rule(
                "dermatological",
                vec![any_of(&["rash", "skin lesions", "hives", "skin discoloration"])],
                outcome(Low, 3, "Dermatology", "Dermatological Condition",
                    "Dr. Emily Davis", "#06b6d4"),
            ),
            rule(
                "psychiatric",
                vec![any_of(&["depression", "anxiety", "insomnia"])],
                outcome(Medium, 5, "Psychiatry", "Mental Health Consultation",
                    "Dr. Robert Lee", "#6366f1"),
            ),
        ],
        fallback: outcome(Low, 3, "General Medicine", "General Checkup",
            "Dr. Emily Davis", "#22c55e"),
    }
}

fn builtin_doctors() -> Vec<DoctorProfile> {
    [
        ("Dr. Sarah Johnson", "Cardiology", 150.0, "+1-555-0101"),
        ("Dr. Michael Chen", "Neurology", 140.0, "+1-555-0102"),
        ("Dr. Emily Davis", "General Medicine", 100.0, "+1-555-0103"),
        ("Dr. Robert Lee", "Pediatrics", 120.0, "+1-555-0104"),
        ("Dr. Anna Martinez", "Orthopedics", 130.0, "+1-555-0105"),
        ("Dr. James Wilson", "Respiratory Medicine", 145.0, "+1-555-0106"),
        ("Dr. Linda Sophia", "Gastroenterology", 135.0, "+1-555-0107"),
        ("Dr. Kevin Park", "Dermatology", 110.0, "+1-555-0108"),
        ("Dr. Rachel Adams", "Psychiatry", 125.0, "+1-555-0109"),
        ("Dr. Steven Wright", "Other", 95.0, "+1-555-0110"),
    ]
    .into_iter()
    .map(|(name, specialty, hourly_cost, contact)| DoctorProfile {
        name: name.into(),
        specialty: specialty.into(),
        hourly_cost,
        contact: Some(contact.into()),
    })
    .collect()
}

fn builtin_rooms() -> RoomTable {
    RoomTable {
        rooms: [
            ("Cardiology", "CCU-201"),
            ("Neurology", "Neuro-305"),
            ("Pediatrics", "Pediatric-102"),
            ("General Medicine", "OPD-15"),
            ("Orthopedics", "Ortho-204"),
        ]
        .into_iter()
        .map(|(s, r)| (s.to_string(), r.to_string()))
        .collect(),
        default_room: "OPD-10".into(),
    }
}

fn builtin_beds() -> Vec<BedSpec> {
    fn bed(
        id: &str,
        ward: &str,
        bed_type: &str,
        category: BedCategory,
        gender: Option<Gender>,
        available: bool,
    ) -> BedSpec {
        BedSpec {
            id: id.into(),
            ward: ward.into(),
            bed_type: bed_type.into(),
            category,
            gender,
            available,
        }
    }
    use BedCategory::*;
    vec![
        bed("ICU-1", "ICU", "Critical", Emergency, None, true),
        bed("ICU-2", "ICU", "Critical", Emergency, None, true),
        // ICU-3 starts the week occupied.
        bed("ICU-3", "ICU", "Critical", Emergency, None, false),
        bed("GW-201", "General Ward A", "Standard", General, Some(Gender::Male), true),
        bed("GW-202", "General Ward A", "Standard", General, Some(Gender::Female), true),
        bed("ISO-101", "Isolation", "Isolation", General, None, true),
        bed("PED-1", "Pediatric Ward", "Child", Pediatric, None, true),
        bed("PED-2", "Pediatric Ward", "Child", Pediatric, None, true),
    ]
}

fn builtin_roster_policy() -> RosterPolicy {
    RosterPolicy {
        days: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
            .into_iter()
            .map(String::from)
            .collect(),
        shifts: ["Morning (8AM-2PM)", "Afternoon (2PM-8PM)", "Night (8PM-2AM)"]
            .into_iter()
            .map(String::from)
            .collect(),
        min_patients: 5,
        max_patients: 7,
        revenue_per_patient: 80.0,
        cost_divisor: 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        CatalogConfig::builtin().validate().unwrap();
    }

    #[test]
    fn duplicate_bed_ids_are_rejected() {
        let mut config = CatalogConfig::builtin();
        let dup = config.beds[0].clone();
        config.beds.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_priority_is_rejected() {
        let mut config = CatalogConfig::builtin();
        config.rules.fallback.priority = 11;
        assert!(config.validate().is_err());
    }
}
