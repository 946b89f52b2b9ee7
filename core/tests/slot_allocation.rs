//! Slot allocation by urgency band.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use triage_core::{
    classifier::DiagnosisResult,
    config::CatalogConfig,
    engine::TriageEngine,
    slot_allocator::{SlotAllocator, SlotBand},
    symptoms::SymptomSet,
    types::{Gender, Urgency},
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn diagnosis(urgency: Urgency, specialty: &str) -> DiagnosisResult {
    DiagnosisResult {
        urgency,
        priority: match urgency {
            Urgency::Emergency => 10,
            Urgency::High => 8,
            Urgency::Medium => 5,
            Urgency::Low => 3,
        },
        specialty: specialty.into(),
        disease: "Test".into(),
        doctor: "Dr. Test".into(),
        color: "#000000".into(),
    }
}

fn allocator() -> SlotAllocator {
    SlotAllocator::new(CatalogConfig::builtin().rooms)
}

/// Each urgency band maps to its fixed offset and duration.
#[test]
fn urgency_bands_set_offset_and_duration() {
    let slots = allocator();
    let now = at(2025, 12, 1, 10, 20);

    let e = slots.schedule(&diagnosis(Urgency::Emergency, "Cardiology"), "P", now);
    assert_eq!(e.scheduled_at, now + Duration::minutes(15));
    assert_eq!(e.duration_minutes, 60);

    let h = slots.schedule(&diagnosis(Urgency::High, "Neurology"), "P", now);
    assert_eq!(h.scheduled_at, now + Duration::hours(1));
    assert_eq!(h.duration_minutes, 45);

    let m = slots.schedule(&diagnosis(Urgency::Medium, "Orthopedics"), "P", now);
    assert_eq!(m.scheduled_at, now + Duration::hours(3));
    assert_eq!(m.duration_minutes, 30);

    let l = slots.schedule(&diagnosis(Urgency::Low, "Dermatology"), "P", now);
    assert_eq!(l.scheduled_at, at(2025, 12, 2, 9, 0));
    assert_eq!(l.duration_minutes, 30);
}

/// Low urgency goes to 09:00 the next calendar day, even just before midnight
/// or across a month boundary.
#[test]
fn low_urgency_is_next_day_at_nine() {
    let slots = allocator();
    let low = diagnosis(Urgency::Low, "General Medicine");

    let late = slots.schedule(&low, "P", at(2025, 12, 1, 23, 59));
    assert_eq!(late.scheduled_at, at(2025, 12, 2, 9, 0));

    let early = slots.schedule(&low, "P", at(2025, 12, 1, 0, 5));
    assert_eq!(early.scheduled_at, at(2025, 12, 2, 9, 0));

    let month_end = slots.schedule(&low, "P", at(2026, 1, 31, 14, 0));
    assert_eq!(month_end.scheduled_at, at(2026, 2, 1, 9, 0));
}

/// Every appointment starts strictly after the triage instant.
#[test]
fn appointments_are_never_in_the_past() {
    let slots = allocator();
    let now = at(2025, 12, 1, 23, 50);
    for urgency in Urgency::ALL {
        let a = slots.schedule(&diagnosis(urgency, "Cardiology"), "P", now);
        assert!(a.scheduled_at > now, "{urgency} scheduled at {}", a.scheduled_at);
        assert_eq!(a.urgency, urgency);
        assert_eq!(SlotBand::for_urgency(urgency).duration_minutes, a.duration_minutes);
    }
}

/// Mapped specialties get their room; everything else lands in OPD-10.
#[test]
fn rooms_follow_specialty_table() {
    let slots = allocator();
    let now = at(2025, 12, 1, 9, 0);
    let cases = [
        ("Cardiology", "CCU-201"),
        ("Neurology", "Neuro-305"),
        ("Pediatrics", "Pediatric-102"),
        ("General Medicine", "OPD-15"),
        ("Orthopedics", "Ortho-204"),
        ("Dermatology", "OPD-10"),
        ("Psychiatry", "OPD-10"),
        ("Respiratory Medicine", "OPD-10"),
    ];
    for (specialty, room) in cases {
        let a = slots.schedule(&diagnosis(Urgency::Medium, specialty), "P", now);
        assert_eq!(a.room, room, "room for {specialty}");
        assert_eq!(a.specialty, specialty);
        assert_eq!(a.doctor, "Dr. Test");
    }
}

/// Two identical cases triaged at the same instant get the same slot.
/// Placement does not look at other appointments.
#[test]
fn identical_cases_share_a_slot() {
    let slots = allocator();
    let now = at(2025, 12, 1, 11, 0);
    let d = diagnosis(Urgency::High, "Neurology");
    let a = slots.schedule(&d, "Alice", now);
    let b = slots.schedule(&d, "Bob", now);
    assert_eq!(a.scheduled_at, b.scheduled_at);
    assert_eq!(a.room, b.room);
    assert_ne!(a.patient, b.patient);
}

/// Fever with cough at 30 gets a 30-minute General Medicine slot three hours out.
#[test]
fn respiratory_infection_appointment_end_to_end() {
    let engine = TriageEngine::builtin(7).unwrap();
    let now = at(2025, 12, 3, 8, 15);
    let symptoms: SymptomSet = ["fever", "cough"].iter().collect();
    let d = engine.classify(&symptoms, 30);
    let (appt, _bed) = engine.allocate_appointment_and_bed(&d, "Jane Doe", 30, Gender::Female, now);
    assert_eq!(appt.scheduled_at, at(2025, 12, 3, 11, 15));
    assert_eq!(appt.duration_minutes, 30);
    assert_eq!(appt.room, "OPD-15");
    assert_eq!(appt.doctor, "Dr. Emily Davis");
    assert_eq!(appt.patient, "Jane Doe");
}
