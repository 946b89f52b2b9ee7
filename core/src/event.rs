//! Desk events: the audit trail of every decision the desk makes.
//!
//! RULE: every state change made through the admission workflow is recorded
//! as a DeskEvent in the store's action log. Payloads are JSON so the log
//! can be replayed or diffed between runs.

use crate::types::{BedId, CaseId, PatientId, Urgency};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Variants are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    // ── Admission ──────────────────────────────────
    PatientRegistered {
        case_id: CaseId,
        patient_id: PatientId,
        age: u32,
    },
    CaseTriaged {
        case_id: CaseId,
        patient_id: PatientId,
        urgency: Urgency,
        priority: u8,
        specialty: String,
        disease: String,
        rule: Option<String>,
    },
    AppointmentPlaced {
        case_id: CaseId,
        appointment_id: i64,
        doctor: String,
        room: String,
        scheduled_at: NaiveDateTime,
    },
    BedAllocated {
        case_id: CaseId,
        allocation_id: i64,
        bed_id: BedId,
        ward: String,
    },
    PatientWaitlisted {
        case_id: CaseId,
        allocation_id: i64,
    },

    // ── Follow-up ──────────────────────────────────
    BedReleased {
        allocation_id: i64,
        bed_id: BedId,
    },
    AppointmentRescheduled {
        appointment_id: i64,
        scheduled_at: NaiveDateTime,
    },
    AppointmentStatusChanged {
        appointment_id: i64,
        status: String,
    },

    // ── Planning ───────────────────────────────────
    RosterGenerated {
        week_start: NaiveDate,
        shifts: usize,
        total_cost: f64,
        total_revenue: f64,
        profit: f64,
    },
}

impl DeskEvent {
    /// Stable name for the `action` column of the action log.
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::PatientRegistered { .. } => "patient_registered",
            Self::CaseTriaged { .. } => "case_triaged",
            Self::AppointmentPlaced { .. } => "appointment_placed",
            Self::BedAllocated { .. } => "bed_allocated",
            Self::PatientWaitlisted { .. } => "patient_waitlisted",
            Self::BedReleased { .. } => "bed_released",
            Self::AppointmentRescheduled { .. } => "appointment_rescheduled",
            Self::AppointmentStatusChanged { .. } => "appointment_status_changed",
            Self::RosterGenerated { .. } => "roster_generated",
        }
    }
}

/// An action log row as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: Option<i64>,
    pub action: String,
    pub details: String, // JSON-serialized DeskEvent, or free text
    pub logged_at: NaiveDateTime,
}
