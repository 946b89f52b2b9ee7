//! Deterministic synthetic patients for demos and load runs.
//!
//! Same RNG seed = same patients, symptom picks included.

use crate::{intake::RawIntake, rng::DeskRng, symptoms::SYMPTOM_CATEGORIES};

pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically.
    pub fn generate_full_name(rng: &mut DeskRng) -> String {
        let first = rng.pick(FIRST_NAMES);
        let last = rng.pick(LAST_NAMES);
        format!("{first} {last}")
    }

    /// A complete, valid intake form for a made-up patient.
    ///
    /// Ages skew adult; roughly one patient in six is a minor. One to three
    /// symptoms are drawn, usually from a single category.
    pub fn generate_intake(rng: &mut DeskRng) -> RawIntake {
        let name = Self::generate_full_name(rng);
        let age = if rng.chance(1.0 / 6.0) {
            rng.next_in_range(0, 17)
        } else {
            rng.next_in_range(18, 90)
        };
        let gender = if rng.chance(0.5) { "male" } else { "female" };

        let primary = rng.pick(SYMPTOM_CATEGORIES);
        let count = rng.next_in_range(1, 3);
        let symptoms = (0..count)
            .map(|_| {
                let category = if rng.chance(0.8) {
                    primary
                } else {
                    rng.pick(SYMPTOM_CATEGORIES)
                };
                rng.pick(category.symptoms).to_string()
            })
            .collect();

        RawIntake {
            name,
            age: age.to_string(),
            gender: gender.to_string(),
            contact: Some(format!("+1-555-{:04}", rng.next_u64_below(10_000))),
            address: None,
            symptoms,
        }
    }
}

const FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph",
    "Thomas", "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Paul",
    "Andrew", "Joshua", "Kevin", "Brian", "George", "Edward", "Ryan", "Jacob",
    "Mary", "Patricia", "Jennifer", "Linda", "Barbara", "Elizabeth", "Susan",
    "Jessica", "Sarah", "Karen", "Lisa", "Nancy", "Margaret", "Sandra", "Ashley",
    "Emily", "Donna", "Michelle", "Amanda", "Melissa", "Rebecca", "Laura", "Anna",
    "Aisha", "Mei", "Priya", "Fatima", "Yusuf", "Arjun", "Sofia", "Mateo", "Hana",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Clark", "Lewis", "Robinson", "Walker", "Young", "Allen",
    "Khan", "Nguyen", "Patel", "Kim", "Chen", "Singh", "Ali", "Okafor", "Haddad",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        intake::validate_intake,
        rng::{RngBank, RngStream},
    };

    #[test]
    fn synthetic_intakes_validate_and_replay() {
        let bank = RngBank::new(42);
        let mut a = bank.for_stream(RngStream::SyntheticIntake);
        let mut b = bank.for_stream(RngStream::SyntheticIntake);
        for _ in 0..200 {
            let ra = NameGenerator::generate_intake(&mut a);
            let rb = NameGenerator::generate_intake(&mut b);
            assert_eq!(ra.name, rb.name);
            assert_eq!(ra.symptoms, rb.symptoms);
            validate_intake(&ra).expect("synthetic intake must be valid");
        }
    }
}
