use super::{fmt_ts, parse_enum, parse_ts, HospitalStore};
use crate::{
    error::{DeskError, DeskResult},
    slot_allocator::Appointment,
    types::{PatientId, Urgency},
};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Appointment lifecycle. Only the record store moves an appointment
/// between states; the engine only ever creates `Scheduled` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Scheduled" => Some(Self::Scheduled),
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_id: i64,
    pub patient_id: PatientId,
    pub diagnosis_id: i64,
    pub appointment: Appointment,
    pub status: AppointmentStatus,
}

const APPOINTMENT_COLUMNS: &str = "appointment_id, patient_id, diagnosis_id, patient_label,
     doctor_name, specialty, scheduled_at, room, duration, urgency, status";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRecord> {
    Ok(AppointmentRecord {
        appointment_id: row.get(0)?,
        patient_id: row.get(1)?,
        diagnosis_id: row.get(2)?,
        appointment: Appointment {
            patient: row.get(3)?,
            doctor: row.get(4)?,
            specialty: row.get(5)?,
            scheduled_at: parse_ts(row.get(6)?, 6)?,
            room: row.get(7)?,
            duration_minutes: row.get(8)?,
            urgency: parse_enum(row.get(9)?, 9, Urgency::parse)?,
        },
        status: parse_enum(row.get(10)?, 10, AppointmentStatus::parse)?,
    })
}

impl HospitalStore {
    // ── Appointment ───────────────────────────────────────────────

    pub fn insert_appointment(
        &self,
        patient_id: PatientId,
        diagnosis_id: i64,
        a: &Appointment,
    ) -> DeskResult<i64> {
        self.conn.execute(
            "INSERT INTO appointment (
                patient_id, diagnosis_id, patient_label, doctor_name, specialty,
                scheduled_at, room, duration, urgency, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                patient_id,
                diagnosis_id,
                a.patient,
                a.doctor,
                a.specialty,
                fmt_ts(&a.scheduled_at),
                a.room,
                a.duration_minutes,
                a.urgency.as_str(),
                AppointmentStatus::Scheduled.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_appointment(&self, appointment_id: i64) -> DeskResult<Option<AppointmentRecord>> {
        let sql =
            format!("SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE appointment_id = ?1");
        let record = self
            .conn
            .query_row(&sql, params![appointment_id], appointment_from_row)
            .optional()?;
        Ok(record)
    }

    pub fn patient_appointments(&self, patient_id: PatientId) -> DeskResult<Vec<AppointmentRecord>> {
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment
             WHERE patient_id = ?1 ORDER BY scheduled_at DESC, appointment_id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![patient_id], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Scheduled appointments at or after `now`, soonest first.
    pub fn upcoming_appointments(
        &self,
        now: NaiveDateTime,
        limit: usize,
    ) -> DeskResult<Vec<AppointmentRecord>> {
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment
             WHERE status = 'Scheduled' AND scheduled_at >= ?1
             ORDER BY scheduled_at ASC, appointment_id ASC LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![fmt_ts(&now), limit as i64], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn update_appointment_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> DeskResult<()> {
        let changed = self.conn.execute(
            "UPDATE appointment SET status = ?1 WHERE appointment_id = ?2",
            params![status.as_str(), appointment_id],
        )?;
        ensure_found(changed, appointment_id)
    }

    pub fn cancel_appointment(&self, appointment_id: i64) -> DeskResult<()> {
        self.update_appointment_status(appointment_id, AppointmentStatus::Cancelled)
    }

    /// Move a scheduled appointment. Cancelled or completed ones cannot move.
    pub fn reschedule_appointment(
        &self,
        appointment_id: i64,
        new_time: NaiveDateTime,
    ) -> DeskResult<()> {
        let current = self
            .get_appointment(appointment_id)?
            .ok_or_else(|| not_found(appointment_id))?;
        if current.status != AppointmentStatus::Scheduled {
            return Err(DeskError::invalid(
                "appointment",
                format!(
                    "appointment {appointment_id} is {} and cannot be rescheduled",
                    current.status.as_str()
                ),
            ));
        }
        self.conn.execute(
            "UPDATE appointment SET scheduled_at = ?1 WHERE appointment_id = ?2",
            params![fmt_ts(&new_time), appointment_id],
        )?;
        Ok(())
    }

    pub fn appointment_count(&self, status: Option<AppointmentStatus>) -> DeskResult<i64> {
        let count = match status {
            Some(s) => self.conn.query_row(
                "SELECT COUNT(*) FROM appointment WHERE status = ?1",
                params![s.as_str()],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM appointment", [], |row| row.get(0))?,
        };
        Ok(count)
    }
}

fn not_found(appointment_id: i64) -> DeskError {
    DeskError::NotFound {
        entity: "appointment",
        id: appointment_id.to_string(),
    }
}

fn ensure_found(changed: usize, appointment_id: i64) -> DeskResult<()> {
    if changed == 0 {
        Err(not_found(appointment_id))
    } else {
        Ok(())
    }
}
