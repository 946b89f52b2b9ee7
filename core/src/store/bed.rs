use super::{fmt_ts, parse_enum, parse_ts, HospitalStore};
use crate::{
    bed_pool::BedAssignment,
    error::{DeskError, DeskResult},
    types::{BedId, PatientId},
};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedAllocationStatus {
    Occupied,
    Waitlisted,
    Discharged,
}

impl BedAllocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupied => "Occupied",
            Self::Waitlisted => "Waitlisted",
            Self::Discharged => "Discharged",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Occupied" => Some(Self::Occupied),
            "Waitlisted" => Some(Self::Waitlisted),
            "Discharged" => Some(Self::Discharged),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedAllocationRecord {
    pub allocation_id: i64,
    pub patient_id: PatientId,
    pub bed_id: BedId,
    pub ward: String,
    pub bed_type: String,
    pub estimated_stay: Option<String>,
    pub allocated_at: NaiveDateTime,
    pub status: BedAllocationStatus,
    pub discharged_at: Option<NaiveDateTime>,
}

/// A bed currently held by a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedBed {
    pub allocation_id: i64,
    pub patient_name: String,
    pub bed_id: BedId,
    pub ward: String,
    pub allocated_at: NaiveDateTime,
}

const ALLOCATION_COLUMNS: &str = "allocation_id, patient_id, bed_id, ward, bed_type,
     estimated_stay, allocated_at, status, discharged_at";

fn allocation_from_row(row: &Row<'_>) -> rusqlite::Result<BedAllocationRecord> {
    Ok(BedAllocationRecord {
        allocation_id: row.get(0)?,
        patient_id: row.get(1)?,
        bed_id: row.get(2)?,
        ward: row.get(3)?,
        bed_type: row.get(4)?,
        estimated_stay: row.get(5)?,
        allocated_at: parse_ts(row.get(6)?, 6)?,
        status: parse_enum(row.get(7)?, 7, BedAllocationStatus::parse)?,
        discharged_at: row
            .get::<_, Option<String>>(8)?
            .map(|raw| parse_ts(raw, 8))
            .transpose()?,
    })
}

impl HospitalStore {
    // ── Bed allocation ────────────────────────────────────────────

    /// Persist an allocation outcome. Waitlist placements are stored too,
    /// with status `Waitlisted`, so the queue is visible in statistics.
    pub fn insert_bed_allocation(
        &self,
        patient_id: PatientId,
        a: &BedAssignment,
    ) -> DeskResult<i64> {
        let status = if a.placement.is_waitlist() {
            BedAllocationStatus::Waitlisted
        } else {
            BedAllocationStatus::Occupied
        };
        self.conn.execute(
            "INSERT INTO bed_allocation (
                patient_id, bed_id, ward, bed_type, estimated_stay, allocated_at, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                patient_id,
                a.placement.id(),
                a.placement.ward(),
                a.placement.bed_type(),
                a.estimated_stay,
                fmt_ts(&a.assigned_at),
                status.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_bed_allocation(&self, allocation_id: i64) -> DeskResult<Option<BedAllocationRecord>> {
        let sql = format!(
            "SELECT {ALLOCATION_COLUMNS} FROM bed_allocation WHERE allocation_id = ?1"
        );
        let record = self
            .conn
            .query_row(&sql, params![allocation_id], allocation_from_row)
            .optional()?;
        Ok(record)
    }

    /// The patient's most recent allocation, if any.
    pub fn patient_bed_allocation(
        &self,
        patient_id: PatientId,
    ) -> DeskResult<Option<BedAllocationRecord>> {
        let sql = format!(
            "SELECT {ALLOCATION_COLUMNS} FROM bed_allocation
             WHERE patient_id = ?1 ORDER BY allocated_at DESC, allocation_id DESC LIMIT 1"
        );
        let record = self
            .conn
            .query_row(&sql, params![patient_id], allocation_from_row)
            .optional()?;
        Ok(record)
    }

    /// Mark an occupied allocation discharged and return the updated row.
    /// The caller is responsible for returning the bed to the live pool.
    pub fn discharge_bed_allocation(
        &self,
        allocation_id: i64,
        at: NaiveDateTime,
    ) -> DeskResult<BedAllocationRecord> {
        let current = self
            .get_bed_allocation(allocation_id)?
            .ok_or_else(|| DeskError::NotFound {
                entity: "bed allocation",
                id: allocation_id.to_string(),
            })?;
        if current.status != BedAllocationStatus::Occupied {
            return Err(DeskError::invalid(
                "bed allocation",
                format!(
                    "allocation {allocation_id} is {} and cannot be discharged",
                    current.status.as_str()
                ),
            ));
        }
        self.conn.execute(
            "UPDATE bed_allocation SET status = ?1, discharged_at = ?2
             WHERE allocation_id = ?3",
            params![
                BedAllocationStatus::Discharged.as_str(),
                fmt_ts(&at),
                allocation_id
            ],
        )?;
        Ok(BedAllocationRecord {
            status: BedAllocationStatus::Discharged,
            discharged_at: Some(at),
            ..current
        })
    }

    pub fn occupied_beds(&self) -> DeskResult<Vec<OccupiedBed>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.allocation_id, p.name, b.bed_id, b.ward, b.allocated_at
             FROM bed_allocation b
             JOIN patient p ON b.patient_id = p.patient_id
             WHERE b.status = 'Occupied'
             ORDER BY b.allocated_at DESC, b.allocation_id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(OccupiedBed {
                allocation_id: row.get(0)?,
                patient_name: row.get(1)?,
                bed_id: row.get(2)?,
                ward: row.get(3)?,
                allocated_at: parse_ts(row.get(4)?, 4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn bed_allocation_count(&self, status: BedAllocationStatus) -> DeskResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM bed_allocation WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
