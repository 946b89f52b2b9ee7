use super::{
    appointment::{AppointmentRecord, AppointmentStatus},
    bed::{BedAllocationRecord, BedAllocationStatus},
    diagnosis::DiagnosisRecord,
    fmt_date,
    patient::PatientRecord,
    HospitalStore,
};
use crate::{error::DeskResult, types::PatientId};
use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskStatistics {
    pub total_patients: i64,
    pub total_appointments: i64,
    pub scheduled_appointments: i64,
    pub occupied_beds: i64,
    pub waitlisted_cases: i64,
    pub emergency_cases_today: i64,
}

/// Everything recorded about one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientHistory {
    pub patient: PatientRecord,
    pub symptoms: Vec<String>,
    pub diagnoses: Vec<DiagnosisRecord>,
    pub appointments: Vec<AppointmentRecord>,
    pub bed_allocation: Option<BedAllocationRecord>,
}

impl HospitalStore {
    // ── Statistics ────────────────────────────────────────────────

    /// Desk-wide counters. "Today" is supplied by the caller.
    pub fn statistics(&self, today: NaiveDate) -> DeskResult<DeskStatistics> {
        let total_patients: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM patient", [], |row| row.get(0))?;
        let emergency_cases_today: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM diagnosis
             WHERE urgency = 'Emergency' AND substr(diagnosed_at, 1, 10) = ?1",
            params![fmt_date(&today)],
            |row| row.get(0),
        )?;
        Ok(DeskStatistics {
            total_patients,
            total_appointments: self.appointment_count(None)?,
            scheduled_appointments: self.appointment_count(Some(AppointmentStatus::Scheduled))?,
            occupied_beds: self.bed_allocation_count(BedAllocationStatus::Occupied)?,
            waitlisted_cases: self.bed_allocation_count(BedAllocationStatus::Waitlisted)?,
            emergency_cases_today,
        })
    }

    pub fn patient_history(&self, patient_id: PatientId) -> DeskResult<Option<PatientHistory>> {
        let Some(patient) = self.get_patient(patient_id)? else {
            return Ok(None);
        };
        Ok(Some(PatientHistory {
            patient,
            symptoms: self.patient_symptoms(patient_id)?,
            diagnoses: self.patient_diagnoses(patient_id)?,
            appointments: self.patient_appointments(patient_id)?,
            bed_allocation: self.patient_bed_allocation(patient_id)?,
        }))
    }
}
