//! Boundary validation of raw intake input.
//!
//! Everything the presentation layer collects arrives here as text.
//! Only a validated `PatientIntake` may reach the classifier.

use crate::{
    error::{DeskError, DeskResult},
    symptoms::SymptomSet,
    types::Gender,
};
use serde::{Deserialize, Serialize};

/// Upper bound on a plausible age; anything above is a typo.
pub const MAX_AGE: u32 = 130;

/// Unvalidated intake form, exactly as collected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIntake {
    pub name: String,
    pub age: String,
    pub gender: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIntake {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub symptoms: SymptomSet,
}

pub fn validate_intake(raw: &RawIntake) -> DeskResult<PatientIntake> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(DeskError::invalid("name", "Please enter patient name"));
    }

    let age = parse_age(&raw.age)?;

    let gender = Gender::parse(&raw.gender).ok_or_else(|| {
        DeskError::invalid("gender", format!("Unknown gender '{}'", raw.gender.trim()))
    })?;

    let symptoms: SymptomSet = raw.symptoms.iter().collect();
    if symptoms.is_empty() {
        return Err(DeskError::invalid(
            "symptoms",
            "Please select at least one symptom",
        ));
    }

    Ok(PatientIntake {
        name: name.to_string(),
        age,
        gender,
        contact: non_blank(raw.contact.as_deref()),
        address: non_blank(raw.address.as_deref()),
        symptoms,
    })
}

fn parse_age(raw: &str) -> DeskResult<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DeskError::invalid("age", "Please enter patient age"));
    }
    // Digits only: rejects signs, decimals and words alike.
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(DeskError::invalid(
            "age",
            "Please enter a valid age (numbers only)",
        ));
    }
    let age: u32 = raw
        .parse()
        .map_err(|_| DeskError::invalid("age", "Age is out of range"))?;
    if age > MAX_AGE {
        return Err(DeskError::invalid("age", format!("Age {age} is out of range")));
    }
    Ok(age)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
