//! Admission workflow: the caller side of the engine.
//!
//! Mirrors what the intake screen does for one patient:
//!   1. validate the raw form          (intake.rs)
//!   2. classify                       (engine)
//!   3. place appointment + bed        (engine)
//!   4. persist patient, symptoms, diagnosis, appointment and bed,
//!      logging every step             (store, one transaction)
//!
//! Every admission's writes commit together or not at all; a failed commit
//! hands the bed back to the live pool. Follow-up operations (discharge,
//! reschedule, cancel) and weekly roster planning go through here too, and
//! `restore_occupancy` rebuilds the pool from an existing database.

use crate::{
    bed_pool::{BedAssignment, BedPlacement},
    classifier::Classification,
    engine::TriageEngine,
    error::{DeskError, DeskResult},
    event::DeskEvent,
    intake::{validate_intake, PatientIntake, RawIntake},
    roster::{FitnessMetrics, WeeklyRoster},
    slot_allocator::Appointment,
    store::{AppointmentStatus, BedAllocationRecord, HospitalStore},
    types::{CaseId, PatientId},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionOutcome {
    pub case_id: CaseId,
    pub patient_id: PatientId,
    pub diagnosis_id: i64,
    pub classification: Classification,
    pub appointment_id: i64,
    pub appointment: Appointment,
    pub allocation_id: i64,
    pub bed: BedAssignment,
}

pub struct AdmissionDesk<'a> {
    engine: &'a TriageEngine,
    store: &'a HospitalStore,
}

impl<'a> AdmissionDesk<'a> {
    pub fn new(engine: &'a TriageEngine, store: &'a HospitalStore) -> Self {
        Self { engine, store }
    }

    /// Validate and admit one patient. Invalid input is rejected before
    /// anything is written.
    pub fn admit(&self, raw: &RawIntake, now: NaiveDateTime) -> DeskResult<AdmissionOutcome> {
        let intake = validate_intake(raw)?;
        self.admit_validated(&intake, now)
    }

    pub fn admit_validated(
        &self,
        intake: &PatientIntake,
        now: NaiveDateTime,
    ) -> DeskResult<AdmissionOutcome> {
        let case_id = Uuid::new_v4().to_string();

        let classification = self.engine.explain(&intake.symptoms, intake.age);
        let diagnosis = &classification.diagnosis;
        let (appointment, bed) = self.engine.allocate_appointment_and_bed(
            diagnosis,
            &intake.name,
            intake.age,
            intake.gender,
            now,
        );

        // One admission is one transaction: either every row lands or none does.
        let persisted = self.store.transaction(|store| {
            persist_admission(store, intake, &case_id, &classification, &appointment, &bed, now)
        });
        let (patient_id, diagnosis_id, appointment_id, allocation_id) = match persisted {
            Ok(ids) => ids,
            Err(e) => {
                // The live pool already handed out the bed; give it back.
                if let BedPlacement::Bed { id, .. } = &bed.placement {
                    self.engine.release_bed(id)?;
                }
                log::warn!("case {case_id}: admission rolled back: {e}");
                return Err(e);
            }
        };

        log::info!(
            "case {case_id}: {} ({} / {}) → {} at {}, bed {}",
            intake.name,
            diagnosis.urgency,
            diagnosis.specialty,
            appointment.room,
            appointment.scheduled_at,
            bed.placement.id(),
        );

        Ok(AdmissionOutcome {
            case_id,
            patient_id,
            diagnosis_id,
            classification,
            appointment_id,
            appointment,
            allocation_id,
            bed,
        })
    }

    /// Replay the store's occupied allocations onto the live pool. Call once
    /// after opening an existing database, before admitting anyone.
    /// Returns how many beds were taken out of the pool.
    pub fn restore_occupancy(&self) -> DeskResult<usize> {
        let mut restored = 0;
        for occupied in self.store.occupied_beds()? {
            match self.engine.bed_pool().mark_occupied(&occupied.bed_id) {
                Ok(true) => restored += 1,
                Ok(false) => {}
                Err(DeskError::UnknownBed { bed_id }) => log::warn!(
                    "allocation {} holds bed {bed_id}, which is not in the catalog",
                    occupied.allocation_id
                ),
                Err(e) => return Err(e),
            }
        }
        if restored > 0 {
            log::info!("restored {restored} occupied beds from the store");
        }
        Ok(restored)
    }

    /// Discharge an occupied allocation and return its bed to the pool.
    pub fn discharge(
        &self,
        allocation_id: i64,
        now: NaiveDateTime,
    ) -> DeskResult<BedAllocationRecord> {
        let record = self.store.discharge_bed_allocation(allocation_id, now)?;
        let was_occupied = self.engine.release_bed(&record.bed_id)?;
        if !was_occupied {
            log::warn!(
                "bed {} was already free in the live pool when allocation {allocation_id} was discharged",
                record.bed_id
            );
        }
        self.store.log_event(
            &DeskEvent::BedReleased {
                allocation_id,
                bed_id: record.bed_id.clone(),
            },
            now,
        )?;
        Ok(record)
    }

    pub fn reschedule(
        &self,
        appointment_id: i64,
        new_time: NaiveDateTime,
        now: NaiveDateTime,
    ) -> DeskResult<()> {
        self.store.reschedule_appointment(appointment_id, new_time)?;
        self.store.log_event(
            &DeskEvent::AppointmentRescheduled {
                appointment_id,
                scheduled_at: new_time,
            },
            now,
        )
    }

    pub fn set_appointment_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
        now: NaiveDateTime,
    ) -> DeskResult<()> {
        self.store.update_appointment_status(appointment_id, status)?;
        self.store.log_event(
            &DeskEvent::AppointmentStatusChanged {
                appointment_id,
                status: status.as_str().to_string(),
            },
            now,
        )
    }

    pub fn cancel(&self, appointment_id: i64, now: NaiveDateTime) -> DeskResult<()> {
        self.set_appointment_status(appointment_id, AppointmentStatus::Cancelled, now)
    }

    /// Generate, persist and log the roster for one week.
    pub fn plan_week(
        &self,
        week_start: NaiveDate,
        now: NaiveDateTime,
    ) -> DeskResult<(WeeklyRoster, FitnessMetrics)> {
        let (roster, metrics) = self.engine.generate_weekly_roster(week_start);
        self.store.save_weekly_roster(&roster)?;
        self.store.log_event(
            &DeskEvent::RosterGenerated {
                week_start,
                shifts: roster.len(),
                total_cost: metrics.total_cost,
                total_revenue: metrics.total_revenue,
                profit: metrics.profit,
            },
            now,
        )?;
        Ok((roster, metrics))
    }
}

/// Every write of one admission, in order. Runs inside the caller's transaction.
fn persist_admission(
    store: &HospitalStore,
    intake: &PatientIntake,
    case_id: &str,
    classification: &Classification,
    appointment: &Appointment,
    bed: &BedAssignment,
    now: NaiveDateTime,
) -> DeskResult<(PatientId, i64, i64, i64)> {
    let patient_id = store.insert_patient(intake, now)?;
    store.insert_symptoms(patient_id, &intake.symptoms, now)?;
    store.log_event(
        &DeskEvent::PatientRegistered {
            case_id: case_id.to_string(),
            patient_id,
            age: intake.age,
        },
        now,
    )?;

    let diagnosis = &classification.diagnosis;
    let diagnosis_id = store.insert_diagnosis(patient_id, case_id, classification, now)?;
    store.log_event(
        &DeskEvent::CaseTriaged {
            case_id: case_id.to_string(),
            patient_id,
            urgency: diagnosis.urgency,
            priority: diagnosis.priority,
            specialty: diagnosis.specialty.clone(),
            disease: diagnosis.disease.clone(),
            rule: classification.matched_rule.clone(),
        },
        now,
    )?;

    let appointment_id = store.insert_appointment(patient_id, diagnosis_id, appointment)?;
    store.log_event(
        &DeskEvent::AppointmentPlaced {
            case_id: case_id.to_string(),
            appointment_id,
            doctor: appointment.doctor.clone(),
            room: appointment.room.clone(),
            scheduled_at: appointment.scheduled_at,
        },
        now,
    )?;

    let allocation_id = store.insert_bed_allocation(patient_id, bed)?;
    let event = match &bed.placement {
        BedPlacement::Bed { id, ward, .. } => DeskEvent::BedAllocated {
            case_id: case_id.to_string(),
            allocation_id,
            bed_id: id.clone(),
            ward: ward.clone(),
        },
        BedPlacement::Waitlist => DeskEvent::PatientWaitlisted {
            case_id: case_id.to_string(),
            allocation_id,
        },
    };
    store.log_event(&event, now)?;
    Ok((patient_id, diagnosis_id, appointment_id, allocation_id))
}
