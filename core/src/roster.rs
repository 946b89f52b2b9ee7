//! Weekly staffing roster.
//!
//! Doctor for cell (day d, shift s) is `doctors[(d * shifts + s) mod doctors]`,
//! a round-robin that spreads the week evenly over the catalog regardless of
//! specialty. Patient load per cell is a seeded draw from the policy range.
//! There is no search: one roster is produced and scored, never compared
//! against alternatives.

use crate::{
    catalog::{DoctorProfile, RosterPolicy},
    error::{DeskError, DeskResult},
    rng::DeskRng,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub day: String,
    pub date: NaiveDate,
    pub shift: String,
    pub doctor: String,
    pub specialty: String,
    pub patient_count: u32,
    pub cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRoster {
    pub week_start: NaiveDate,
    /// Day-major: all shifts of day 0, then day 1, ...
    pub entries: Vec<RosterEntry>,
    shifts_per_day: usize,
}

impl WeeklyRoster {
    pub fn new(week_start: NaiveDate, entries: Vec<RosterEntry>, shifts_per_day: usize) -> Self {
        Self {
            week_start,
            entries,
            shifts_per_day,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cell(&self, day_idx: usize, shift_idx: usize) -> Option<&RosterEntry> {
        if shift_idx >= self.shifts_per_day {
            return None;
        }
        self.entries.get(day_idx * self.shifts_per_day + shift_idx)
    }

    pub fn days(&self) -> impl Iterator<Item = &[RosterEntry]> {
        self.entries.chunks(self.shifts_per_day.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessMetrics {
    pub total_cost: f64,
    pub total_revenue: f64,
    pub profit: f64,
    pub avg_patients_per_shift: f64,
    pub shifts_per_doctor: BTreeMap<String, u32>,
}

impl FitnessMetrics {
    pub fn from_entries(entries: &[RosterEntry]) -> Self {
        let total_cost: f64 = entries.iter().map(|e| e.cost).sum();
        let total_revenue: f64 = entries.iter().map(|e| e.revenue).sum();
        let total_patients: u32 = entries.iter().map(|e| e.patient_count).sum();
        let avg_patients_per_shift = if entries.is_empty() {
            0.0
        } else {
            f64::from(total_patients) / entries.len() as f64
        };
        let mut shifts_per_doctor = BTreeMap::new();
        for e in entries {
            *shifts_per_doctor.entry(e.doctor.clone()).or_insert(0) += 1;
        }
        Self {
            total_cost,
            total_revenue,
            profit: total_revenue - total_cost,
            avg_patients_per_shift,
            shifts_per_doctor,
        }
    }
}

#[derive(Debug)]
pub struct RosterPlanner {
    doctors: Vec<DoctorProfile>,
    policy: RosterPolicy,
}

impl RosterPlanner {
    /// Rejects inputs `generate` cannot work with: no doctors to rotate,
    /// no days or shifts, or an empty patient range.
    pub fn new(doctors: Vec<DoctorProfile>, policy: RosterPolicy) -> DeskResult<Self> {
        if doctors.is_empty() {
            return Err(DeskError::invalid("doctors", "roster needs at least one doctor"));
        }
        if policy.days.is_empty() || policy.shifts.is_empty() {
            return Err(DeskError::invalid(
                "roster",
                "policy needs at least one day and one shift",
            ));
        }
        if policy.min_patients > policy.max_patients {
            return Err(DeskError::invalid(
                "roster",
                format!(
                    "patient range {}..={} is empty",
                    policy.min_patients, policy.max_patients
                ),
            ));
        }
        Ok(Self { doctors, policy })
    }

    pub fn policy(&self) -> &RosterPolicy {
        &self.policy
    }

    /// Catalog index of the doctor covering (day, shift).
    pub fn doctor_index(&self, day_idx: usize, shift_idx: usize) -> usize {
        (day_idx * self.policy.shifts.len() + shift_idx) % self.doctors.len()
    }

    pub fn generate(
        &self,
        week_start: NaiveDate,
        rng: &mut DeskRng,
    ) -> (WeeklyRoster, FitnessMetrics) {
        let mut entries =
            Vec::with_capacity(self.policy.days.len() * self.policy.shifts.len());

        for (day_idx, day) in self.policy.days.iter().enumerate() {
            let date = week_start + Duration::days(day_idx as i64);
            for (shift_idx, shift) in self.policy.shifts.iter().enumerate() {
                let doctor = &self.doctors[self.doctor_index(day_idx, shift_idx)];
                let patient_count =
                    rng.next_in_range(self.policy.min_patients, self.policy.max_patients);
                let patients = f64::from(patient_count);

                entries.push(RosterEntry {
                    day: day.clone(),
                    date,
                    shift: shift.clone(),
                    doctor: doctor.name.clone(),
                    specialty: doctor.specialty.clone(),
                    patient_count,
                    cost: patients * doctor.hourly_cost / self.policy.cost_divisor,
                    revenue: patients * self.policy.revenue_per_patient,
                });
            }
        }

        let metrics = FitnessMetrics::from_entries(&entries);
        log::info!(
            "roster for week of {week_start} ({} stream): {} shifts, cost={:.2} revenue={:.2} profit={:.2}",
            rng.name,
            entries.len(),
            metrics.total_cost,
            metrics.total_revenue,
            metrics.profit,
        );

        let roster = WeeklyRoster::new(week_start, entries, self.policy.shifts.len());
        (roster, metrics)
    }
}
