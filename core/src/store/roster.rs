use super::{fmt_date, parse_date, round2, HospitalStore};
use crate::{
    error::DeskResult,
    roster::{RosterEntry, WeeklyRoster},
};
use chrono::NaiveDate;
use rusqlite::params;

impl HospitalStore {
    // ── Weekly roster ─────────────────────────────────────────────

    /// Persist a roster, replacing any roster already saved for that week.
    /// Cost and revenue are stored rounded to cents.
    pub fn save_weekly_roster(&self, roster: &WeeklyRoster) -> DeskResult<()> {
        let week = fmt_date(&roster.week_start);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM weekly_roster WHERE week_start = ?1", params![week])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO weekly_roster (
                    week_start, day, shift_date, shift, doctor_name, specialty,
                    patients_count, cost, revenue
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for e in &roster.entries {
                stmt.execute(params![
                    week,
                    e.day,
                    fmt_date(&e.date),
                    e.shift,
                    e.doctor,
                    e.specialty,
                    e.patient_count,
                    round2(e.cost),
                    round2(e.revenue),
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("Saved {} roster rows for week {week}", roster.entries.len());
        Ok(())
    }

    /// Roster rows for a week in day-major insertion order.
    pub fn weekly_roster_entries(&self, week_start: NaiveDate) -> DeskResult<Vec<RosterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, shift_date, shift, doctor_name, specialty, patients_count, cost, revenue
             FROM weekly_roster WHERE week_start = ?1
             ORDER BY roster_id ASC",
        )?;
        let rows = stmt.query_map(params![fmt_date(&week_start)], |row| {
            Ok(RosterEntry {
                day: row.get(0)?,
                date: parse_date(row.get(1)?, 1)?,
                shift: row.get(2)?,
                doctor: row.get(3)?,
                specialty: row.get(4)?,
                patient_count: row.get(5)?,
                cost: row.get(6)?,
                revenue: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Reassemble a saved roster. `shifts_per_day` restores the grid shape.
    pub fn weekly_roster(
        &self,
        week_start: NaiveDate,
        shifts_per_day: usize,
    ) -> DeskResult<Option<WeeklyRoster>> {
        let entries = self.weekly_roster_entries(week_start)?;
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(WeeklyRoster::new(week_start, entries, shifts_per_day)))
    }
}
