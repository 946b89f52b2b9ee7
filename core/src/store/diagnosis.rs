use super::{fmt_ts, parse_enum, parse_ts, HospitalStore};
use crate::{
    classifier::{Classification, DiagnosisResult},
    error::DeskResult,
    types::{CaseId, PatientId, Urgency},
};
use chrono::NaiveDateTime;
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub diagnosis_id: i64,
    pub patient_id: PatientId,
    pub case_id: CaseId,
    pub diagnosis: DiagnosisResult,
    pub matched_rule: Option<String>,
    pub diagnosed_at: NaiveDateTime,
}

impl HospitalStore {
    // ── Diagnosis ─────────────────────────────────────────────────

    pub fn insert_diagnosis(
        &self,
        patient_id: PatientId,
        case_id: &str,
        c: &Classification,
        at: NaiveDateTime,
    ) -> DeskResult<i64> {
        let d = &c.diagnosis;
        self.conn.execute(
            "INSERT INTO diagnosis (
                patient_id, case_id, urgency, priority, specialty, disease,
                assigned_doctor, color, matched_rule, diagnosed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                patient_id,
                case_id,
                d.urgency.as_str(),
                d.priority,
                d.specialty,
                d.disease,
                d.doctor,
                d.color,
                c.matched_rule,
                fmt_ts(&at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Every diagnosis for a patient, newest first.
    pub fn patient_diagnoses(&self, patient_id: PatientId) -> DeskResult<Vec<DiagnosisRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT diagnosis_id, patient_id, case_id, urgency, priority, specialty,
                    disease, assigned_doctor, color, matched_rule, diagnosed_at
             FROM diagnosis WHERE patient_id = ?1
             ORDER BY diagnosed_at DESC, diagnosis_id DESC",
        )?;
        let rows = stmt.query_map(params![patient_id], |row| {
            Ok(DiagnosisRecord {
                diagnosis_id: row.get(0)?,
                patient_id: row.get(1)?,
                case_id: row.get(2)?,
                diagnosis: DiagnosisResult {
                    urgency: parse_enum(row.get(3)?, 3, Urgency::parse)?,
                    priority: row.get(4)?,
                    specialty: row.get(5)?,
                    disease: row.get(6)?,
                    doctor: row.get(7)?,
                    color: row.get(8)?,
                },
                matched_rule: row.get(9)?,
                diagnosed_at: parse_ts(row.get(10)?, 10)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count of diagnoses per urgency, in urgency order.
    pub fn diagnoses_by_urgency(&self) -> DeskResult<Vec<(Urgency, i64)>> {
        let mut out = Vec::with_capacity(Urgency::ALL.len());
        for urgency in Urgency::ALL {
            let count: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM diagnosis WHERE urgency = ?1",
                params![urgency.as_str()],
                |row| row.get(0),
            )?;
            out.push((urgency, count));
        }
        Ok(out)
    }
}
