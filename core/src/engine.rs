//! The triage engine: the desk's three entry points.
//!
//! FLOW:
//!   1. classify()                      symptoms + age → DiagnosisResult
//!   2. allocate_appointment_and_bed()  diagnosis → Appointment + BedAssignment
//!   3. generate_weekly_roster()        week start → WeeklyRoster + metrics
//!
//! RULES:
//!   - The engine never talks to the record store. Persistence happens
//!     around it (see admission.rs).
//!   - The engine never reads the wall clock. `now` is always passed in.
//!   - All randomness flows through the RngBank.
//!   - The bed pool is the only shared mutable state and is safe to share
//!     across threads; everything else is read-only after construction.

use crate::{
    bed_pool::{BedAssignment, BedPool},
    classifier::{Classification, Classifier, DiagnosisResult},
    config::CatalogConfig,
    error::DeskResult,
    rng::{RngBank, RngStream},
    roster::{FitnessMetrics, RosterPlanner, WeeklyRoster},
    slot_allocator::{Appointment, SlotAllocator},
    symptoms::SymptomSet,
    types::Gender,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::sync::Arc;

pub struct TriageEngine {
    classifier: Classifier,
    slots: SlotAllocator,
    beds: Arc<BedPool>,
    planner: RosterPlanner,
    rng_bank: RngBank,
}

impl TriageEngine {
    /// Build an engine with a fresh bed pool from the catalog.
    /// The catalog is validated first; a bad one is rejected here rather
    /// than failing later inside the planner or the pool.
    pub fn new(config: &CatalogConfig, seed: u64) -> DeskResult<Self> {
        let beds = Arc::new(BedPool::new(&config.beds));
        Self::with_bed_pool(config, seed, beds)
    }

    /// Build an engine around an existing (possibly shared) bed pool.
    pub fn with_bed_pool(
        config: &CatalogConfig,
        seed: u64,
        beds: Arc<BedPool>,
    ) -> DeskResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: Classifier::new(config.rules.clone()),
            slots: SlotAllocator::new(config.rooms.clone()),
            beds,
            planner: RosterPlanner::new(config.doctors.clone(), config.roster.clone())?,
            rng_bank: RngBank::new(seed),
        })
    }

    /// Engine over the builtin catalog. Used in tests and the runner's
    /// no-data-dir mode.
    pub fn builtin(seed: u64) -> DeskResult<Self> {
        Self::new(&CatalogConfig::builtin(), seed)
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn bed_pool(&self) -> &Arc<BedPool> {
        &self.beds
    }

    pub fn planner(&self) -> &RosterPlanner {
        &self.planner
    }

    pub fn classify(&self, symptoms: &SymptomSet, age: u32) -> DiagnosisResult {
        self.classifier.classify(symptoms, age)
    }

    pub fn explain(&self, symptoms: &SymptomSet, age: u32) -> Classification {
        self.classifier.explain(symptoms, age)
    }

    /// Place the appointment and reserve a bed for one triaged case.
    /// The two placements are independent of each other.
    pub fn allocate_appointment_and_bed(
        &self,
        diagnosis: &DiagnosisResult,
        patient_label: &str,
        age: u32,
        gender: Gender,
        now: NaiveDateTime,
    ) -> (Appointment, BedAssignment) {
        let appointment = self.slots.schedule(diagnosis, patient_label, now);
        let bed = self.beds.allocate(diagnosis, patient_label, age, gender, now);
        (appointment, bed)
    }

    /// Staffing table for the week starting at `week_start`.
    /// The same (seed, week_start) always yields the same roster.
    pub fn generate_weekly_roster(&self, week_start: NaiveDate) -> (WeeklyRoster, FitnessMetrics) {
        let key = week_start.num_days_from_ce() as u64;
        let mut rng = self.rng_bank.for_stream_keyed(RngStream::Roster, key);
        self.planner.generate(week_start, &mut rng)
    }

    /// Return a bed to the pool after discharge.
    pub fn release_bed(&self, bed_id: &str) -> DeskResult<bool> {
        self.beds.release(bed_id)
    }
}
