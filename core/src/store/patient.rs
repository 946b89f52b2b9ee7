use super::{fmt_ts, parse_enum, parse_ts, HospitalStore};
use crate::{
    error::DeskResult,
    intake::PatientIntake,
    symptoms::SymptomSet,
    types::{Gender, PatientId},
};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: PatientId,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub registered_at: NaiveDateTime,
}

const PATIENT_COLUMNS: &str =
    "patient_id, name, age, gender, contact, address, registered_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<PatientRecord> {
    Ok(PatientRecord {
        patient_id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: parse_enum(row.get(3)?, 3, Gender::parse)?,
        contact: row.get(4)?,
        address: row.get(5)?,
        registered_at: parse_ts(row.get(6)?, 6)?,
    })
}

impl HospitalStore {
    // ── Patient ───────────────────────────────────────────────────

    pub fn insert_patient(&self, p: &PatientIntake, at: NaiveDateTime) -> DeskResult<PatientId> {
        self.conn.execute(
            "INSERT INTO patient (name, age, gender, contact, address, registered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                p.name,
                p.age,
                p.gender.as_str(),
                p.contact,
                p.address,
                fmt_ts(&at)
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_patient(&self, patient_id: PatientId) -> DeskResult<Option<PatientRecord>> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patient WHERE patient_id = ?1");
        let patient = self
            .conn
            .query_row(&sql, params![patient_id], patient_from_row)
            .optional()?;
        Ok(patient)
    }

    /// All patients, most recently registered first.
    pub fn all_patients(&self) -> DeskResult<Vec<PatientRecord>> {
        let sql = format!(
            "SELECT {PATIENT_COLUMNS} FROM patient
             ORDER BY registered_at DESC, patient_id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Case-insensitive substring search over name and contact.
    /// `%` and `_` in the term match literally.
    pub fn search_patients(&self, term: &str) -> DeskResult<Vec<PatientRecord>> {
        let pattern = format!("%{}%", escape_like(term.trim()));
        let sql = format!(
            "SELECT {PATIENT_COLUMNS} FROM patient
             WHERE name LIKE ?1 ESCAPE '\\' OR contact LIKE ?1 ESCAPE '\\'
             ORDER BY registered_at DESC, patient_id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Symptoms ──────────────────────────────────────────────────

    pub fn insert_symptoms(
        &self,
        patient_id: PatientId,
        symptoms: &SymptomSet,
        at: NaiveDateTime,
    ) -> DeskResult<()> {
        let recorded_at = fmt_ts(&at);
        let mut stmt = self.conn.prepare(
            "INSERT INTO symptom (patient_id, symptom_name, recorded_at) VALUES (?1, ?2, ?3)",
        )?;
        for s in symptoms.iter() {
            stmt.execute(params![patient_id, s, recorded_at])?;
        }
        Ok(())
    }

    pub fn patient_symptoms(&self, patient_id: PatientId) -> DeskResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT symptom_name FROM symptom WHERE patient_id = ?1 ORDER BY symptom_id ASC",
        )?;
        let rows = stmt.query_map(params![patient_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

/// Backslash-escape LIKE wildcards so user text is matched verbatim.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
