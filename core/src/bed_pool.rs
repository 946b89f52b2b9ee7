//! The shared bed pool and the bed allocator.
//!
//! RULE: a bed's `available` flag is the only mutable state, and it only
//! changes under the pool's lock. Selecting a bed and clearing its flag
//! happen inside one critical section, so two concurrent allocations can
//! never receive the same bed.
//!
//! Beds live in an arena owned by the pool and indexed by id. Callers only
//! ever see copies (`Bed`, `BedAssignment`), never references into the arena.

use crate::{
    catalog::{BedCategory, BedSpec},
    classifier::DiagnosisResult,
    error::{DeskError, DeskResult},
    types::{BedId, Gender, Urgency},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const WAITLIST_BED_ID: &str = "WAIT-LIST";
pub const WAITLIST_WARD: &str = "Waiting Queue";
pub const WAITLIST_BED_TYPE: &str = "Queue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: BedId,
    pub ward: String,
    pub bed_type: String,
    pub category: BedCategory,
    pub gender: Option<Gender>,
    pub available: bool,
}

impl Bed {
    fn accepts(&self, gender: Gender) -> bool {
        self.gender.map_or(true, |g| g == gender)
    }
}

impl From<&BedSpec> for Bed {
    fn from(spec: &BedSpec) -> Self {
        Self {
            id: spec.id.clone(),
            ward: spec.ward.clone(),
            bed_type: spec.bed_type.clone(),
            category: spec.category,
            gender: spec.gender,
            available: spec.available,
        }
    }
}

/// Where a patient was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BedPlacement {
    Bed {
        id: BedId,
        ward: String,
        bed_type: String,
    },
    /// No eligible bed was free. Not a pool member.
    Waitlist,
}

impl BedPlacement {
    pub fn id(&self) -> &str {
        match self {
            Self::Bed { id, .. } => id,
            Self::Waitlist => WAITLIST_BED_ID,
        }
    }

    pub fn ward(&self) -> &str {
        match self {
            Self::Bed { ward, .. } => ward,
            Self::Waitlist => WAITLIST_WARD,
        }
    }

    pub fn bed_type(&self) -> &str {
        match self {
            Self::Bed { bed_type, .. } => bed_type,
            Self::Waitlist => WAITLIST_BED_TYPE,
        }
    }

    pub fn is_waitlist(&self) -> bool {
        matches!(self, Self::Waitlist)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedAssignment {
    pub patient: String,
    pub placement: BedPlacement,
    pub estimated_stay: String,
    pub assigned_at: NaiveDateTime,
}

/// Which partition a case is eligible for. First applicable rule wins.
pub fn eligible_category(diagnosis: &DiagnosisResult, age: u32) -> BedCategory {
    if diagnosis.urgency == Urgency::Emergency {
        BedCategory::Emergency
    } else if diagnosis.specialty == "Pediatrics" || age < 18 {
        BedCategory::Pediatric
    } else {
        BedCategory::General
    }
}

pub fn estimated_stay(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Emergency => "3-5 days",
        _ => "1-2 days",
    }
}

struct BedArena {
    beds: Vec<Bed>,
    index: HashMap<BedId, usize>,
}

pub struct BedPool {
    arena: Mutex<BedArena>,
}

impl BedPool {
    pub fn new(specs: &[BedSpec]) -> Self {
        let beds: Vec<Bed> = specs.iter().map(Bed::from).collect();
        let index = beds
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
        Self {
            arena: Mutex::new(BedArena { beds, index }),
        }
    }

    // A panic while holding the lock cannot leave a half-applied update:
    // every mutation is a single flag write.
    fn lock(&self) -> MutexGuard<'_, BedArena> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a triaged patient. Flips the chosen bed to unavailable.
    pub fn allocate(
        &self,
        diagnosis: &DiagnosisResult,
        patient_label: &str,
        age: u32,
        gender: Gender,
        now: NaiveDateTime,
    ) -> BedAssignment {
        let category = eligible_category(diagnosis, age);

        let placement = {
            let mut arena = self.lock();
            let chosen = arena.beds.iter_mut().find(|b| {
                b.available
                    && b.category == category
                    && (category != BedCategory::General || b.accepts(gender))
            });
            match chosen {
                Some(bed) => {
                    bed.available = false;
                    BedPlacement::Bed {
                        id: bed.id.clone(),
                        ward: bed.ward.clone(),
                        bed_type: bed.bed_type.clone(),
                    }
                }
                None => BedPlacement::Waitlist,
            }
        };

        match &placement {
            BedPlacement::Bed { id, .. } => {
                log::info!("bed {id} allocated to {patient_label} ({})", category.as_str())
            }
            BedPlacement::Waitlist => log::warn!(
                "no {} bed free for {patient_label}, waitlisted",
                category.as_str()
            ),
        }

        BedAssignment {
            patient: patient_label.to_string(),
            placement,
            estimated_stay: estimated_stay(diagnosis.urgency).to_string(),
            assigned_at: now,
        }
    }

    /// Return a bed to the pool. Returns false if it was already free.
    pub fn release(&self, bed_id: &str) -> DeskResult<bool> {
        let mut arena = self.lock();
        let idx = *arena
            .index
            .get(bed_id)
            .ok_or_else(|| DeskError::UnknownBed {
                bed_id: bed_id.to_string(),
            })?;
        let bed = &mut arena.beds[idx];
        let was_occupied = !bed.available;
        bed.available = true;
        log::debug!("bed {bed_id} released (was_occupied={was_occupied})");
        Ok(was_occupied)
    }

    /// Take a bed out of the pool without a triage decision, e.g. when
    /// replaying occupancy already recorded in the store. Returns false if
    /// the bed was already taken.
    pub fn mark_occupied(&self, bed_id: &str) -> DeskResult<bool> {
        let mut arena = self.lock();
        let idx = *arena
            .index
            .get(bed_id)
            .ok_or_else(|| DeskError::UnknownBed {
                bed_id: bed_id.to_string(),
            })?;
        let bed = &mut arena.beds[idx];
        let was_free = bed.available;
        bed.available = false;
        Ok(was_free)
    }

    pub fn bed(&self, bed_id: &str) -> Option<Bed> {
        let arena = self.lock();
        arena.index.get(bed_id).map(|&i| arena.beds[i].clone())
    }

    pub fn available_count(&self, category: BedCategory) -> usize {
        self.lock()
            .beds
            .iter()
            .filter(|b| b.category == category && b.available)
            .count()
    }

    pub fn capacity(&self, category: BedCategory) -> usize {
        self.lock()
            .beds
            .iter()
            .filter(|b| b.category == category)
            .count()
    }

    /// Copy of every bed, in catalog order.
    pub fn snapshot(&self) -> Vec<Bed> {
        self.lock().beds.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn diagnosis(urgency: Urgency, specialty: &str) -> DiagnosisResult {
        DiagnosisResult {
            urgency,
            priority: 5,
            specialty: specialty.into(),
            disease: "x".into(),
            doctor: "Dr. X".into(),
            color: "#000000".into(),
        }
    }

    #[test]
    fn eligibility_precedence() {
        let emergency = diagnosis(Urgency::Emergency, "Pediatrics");
        assert_eq!(eligible_category(&emergency, 5), BedCategory::Emergency);

        let peds = diagnosis(Urgency::Medium, "Pediatrics");
        assert_eq!(eligible_category(&peds, 40), BedCategory::Pediatric);

        let minor = diagnosis(Urgency::High, "Neurology");
        assert_eq!(eligible_category(&minor, 12), BedCategory::Pediatric);
        assert_eq!(eligible_category(&minor, 18), BedCategory::General);
    }

    #[test]
    fn mark_occupied_takes_a_bed_once() {
        let pool = BedPool::new(&CatalogConfig::builtin().beds);
        let free = pool.available_count(BedCategory::Emergency);
        assert!(pool.mark_occupied("ICU-1").unwrap());
        assert!(!pool.mark_occupied("ICU-1").unwrap());
        assert_eq!(pool.available_count(BedCategory::Emergency), free - 1);
        assert!(matches!(
            pool.mark_occupied("NOPE-1"),
            Err(DeskError::UnknownBed { .. })
        ));
    }

    #[test]
    fn release_of_unknown_bed_is_an_error() {
        let pool = BedPool::new(&CatalogConfig::builtin().beds);
        assert!(matches!(
            pool.release("NOPE-1"),
            Err(DeskError::UnknownBed { .. })
        ));
    }
}
