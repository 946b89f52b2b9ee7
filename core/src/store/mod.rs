//! SQLite record store.
//!
//! RULE: Only store/ talks to the database.
//! The engine never calls the store; the admission workflow and the runner
//! call it around the engine.

use crate::{
    catalog::DoctorProfile,
    error::{DeskError, DeskResult},
    event::{ActionLogEntry, DeskEvent},
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, types::Type, Connection};

mod appointment;
mod bed;
mod diagnosis;
mod patient;
mod roster;
mod stats;

pub use appointment::{AppointmentRecord, AppointmentStatus};
pub use bed::{BedAllocationRecord, BedAllocationStatus, OccupiedBed};
pub use diagnosis::DiagnosisRecord;
pub use patient::PatientRecord;
pub use stats::{DeskStatistics, PatientHistory};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct HospitalStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl HospitalStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new, isolated database.
    pub fn reopen(&self) -> DeskResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_hospital.sql"))?;
        Ok(())
    }

    /// Run `f` inside one transaction. Any error rolls back every write `f` made.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> DeskResult<T>) -> DeskResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Write a consistent copy of the database to `dest`. The file must not exist yet.
    pub fn backup_to(&self, dest: &str, at: NaiveDateTime) -> DeskResult<()> {
        self.conn.execute("VACUUM INTO ?1", params![dest])?;
        log::info!("Database backed up to {dest}");
        self.log_action("database_backup", dest, at)
    }

    // ── Doctors ────────────────────────────────────────────────

    /// Insert the doctor catalog if the table is still empty.
    /// Returns the number of rows inserted.
    pub fn seed_doctors(&self, doctors: &[DoctorProfile]) -> DeskResult<usize> {
        let existing: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM doctor", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }
        let mut stmt = self.conn.prepare(
            "INSERT INTO doctor (name, specialty, cost_per_hour, contact)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for d in doctors {
            stmt.execute(params![d.name, d.specialty, d.hourly_cost, d.contact])?;
        }
        log::debug!("Seeded {} doctors", doctors.len());
        Ok(doctors.len())
    }

    pub fn doctors(&self) -> DeskResult<Vec<DoctorProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, specialty, cost_per_hour, contact
             FROM doctor ORDER BY doctor_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DoctorProfile {
                name: row.get(0)?,
                specialty: row.get(1)?,
                hourly_cost: row.get(2)?,
                contact: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Action log ─────────────────────────────────────────────

    pub fn log_action(&self, action: &str, details: &str, at: NaiveDateTime) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO action_log (action, details, logged_at) VALUES (?1, ?2, ?3)",
            params![action, details, fmt_ts(&at)],
        )?;
        Ok(())
    }

    pub fn log_event(&self, event: &DeskEvent, at: NaiveDateTime) -> DeskResult<()> {
        let payload = serde_json::to_string(event)?;
        self.log_action(event.action_name(), &payload, at)
    }

    /// Most recent log entries, newest first.
    pub fn recent_logs(&self, limit: usize) -> DeskResult<Vec<ActionLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT log_id, action, details, logged_at
             FROM action_log ORDER BY log_id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ActionLogEntry {
                id: Some(row.get(0)?),
                action: row.get(1)?,
                details: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                logged_at: parse_ts(row.get(3)?, 3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Every logged event payload of one action type, oldest first.
    pub fn logged_events(&self, action: &str) -> DeskResult<Vec<DeskEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT details FROM action_log WHERE action = ?1 ORDER BY log_id ASC",
        )?;
        let payloads = stmt
            .query_map(params![action], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(DeskError::from))
            .collect()
    }
}

pub(crate) fn fmt_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub(crate) fn fmt_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_ts(raw: String, column: usize) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&raw, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
    })
}

pub(crate) fn parse_date(raw: String, column: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
    })
}

/// Map a TEXT column through a parser, reporting failures as conversion errors.
pub(crate) fn parse_enum<T>(
    raw: String,
    column: usize,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Text,
            format!("unrecognised value '{raw}'").into(),
        )
    })
}

/// Currency columns are persisted with two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
