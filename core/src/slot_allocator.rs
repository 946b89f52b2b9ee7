//! Appointment placement by urgency band.
//!
//! This is a placement policy, not a calendar: no conflict detection is done
//! against other appointments. Two patients of the same urgency and specialty
//! triaged at the same instant land in the same room at the same time.

use crate::{catalog::RoomTable, classifier::DiagnosisResult, types::Urgency};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub patient: String,
    pub doctor: String,
    pub specialty: String,
    pub scheduled_at: NaiveDateTime,
    pub room: String,
    pub duration_minutes: u32,
    pub urgency: Urgency,
}

/// When an urgency class is seen, relative to triage time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOffset {
    After(Duration),
    /// Next calendar day at this hour.
    NextDayAt(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBand {
    pub offset: SlotOffset,
    pub duration_minutes: u32,
}

impl SlotBand {
    pub fn for_urgency(urgency: Urgency) -> Self {
        match urgency {
            Urgency::Emergency => Self {
                offset: SlotOffset::After(Duration::minutes(15)),
                duration_minutes: 60,
            },
            Urgency::High => Self {
                offset: SlotOffset::After(Duration::hours(1)),
                duration_minutes: 45,
            },
            Urgency::Medium => Self {
                offset: SlotOffset::After(Duration::hours(3)),
                duration_minutes: 30,
            },
            Urgency::Low => Self {
                offset: SlotOffset::NextDayAt(9),
                duration_minutes: 30,
            },
        }
    }

    pub fn start_from(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self.offset {
            SlotOffset::After(delta) => now + delta,
            SlotOffset::NextDayAt(hour) => {
                let midnight = now.date().and_time(NaiveTime::default());
                midnight + Duration::days(1) + Duration::hours(i64::from(hour))
            }
        }
    }
}

pub struct SlotAllocator {
    rooms: RoomTable,
}

impl SlotAllocator {
    pub fn new(rooms: RoomTable) -> Self {
        Self { rooms }
    }

    pub fn schedule(
        &self,
        diagnosis: &DiagnosisResult,
        patient_label: &str,
        now: NaiveDateTime,
    ) -> Appointment {
        let band = SlotBand::for_urgency(diagnosis.urgency);
        let room = self.rooms.room_for(&diagnosis.specialty);
        if room == self.rooms.default_room {
            log::debug!(
                "specialty '{}' has no dedicated room, using {room}",
                diagnosis.specialty
            );
        }
        Appointment {
            patient: patient_label.to_string(),
            doctor: diagnosis.doctor.clone(),
            specialty: diagnosis.specialty.clone(),
            scheduled_at: band.start_from(now),
            room: room.to_string(),
            duration_minutes: band.duration_minutes,
            urgency: diagnosis.urgency,
        }
    }
}
