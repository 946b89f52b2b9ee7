//! First-match triage classification.

use triage_core::{
    config::CatalogConfig,
    engine::TriageEngine,
    symptoms::{all_symptoms, SymptomSet},
    types::Urgency,
};

fn set(symptoms: &[&str]) -> SymptomSet {
    symptoms.iter().collect()
}

/// Symptoms that fire a rule ranked above the pediatric override.
const PRE_PEDIATRIC_TRIGGERS: &[&str] = &[
    "chest pain", "heart palpitations", "heart attack",
    "difficulty breathing", "shortness of breath", "wheezing",
    "severe headache", "dizziness", "confusion", "seizure",
];

/// Chest pain is a cardiac emergency whatever else is present and whatever the age.
#[test]
fn chest_pain_is_always_a_cardiac_emergency() {
    let engine = TriageEngine::builtin(1).unwrap();
    for other in all_symptoms() {
        for age in [0, 5, 17, 18, 30, 65, 120] {
            let d = engine.classify(&set(&["Chest pain", other]), age);
            assert_eq!(d.urgency, Urgency::Emergency, "chest pain + {other}, age {age}");
            assert_eq!(d.priority, 10);
            assert_eq!(d.specialty, "Cardiology");
        }
    }
}

/// Minors without emergency or neurological symptoms always route to Pediatrics.
#[test]
fn minors_without_emergency_symptoms_go_to_pediatrics() {
    let engine = TriageEngine::builtin(1).unwrap();
    let candidates: Vec<&str> = all_symptoms()
        .into_iter()
        .filter(|s| !PRE_PEDIATRIC_TRIGGERS.contains(&s.to_lowercase().as_str()))
        .collect();
    for age in 0..18 {
        for (i, &a) in candidates.iter().enumerate() {
            let b = candidates[(i + 7) % candidates.len()];
            let d = engine.classify(&set(&[a, b]), age);
            assert_eq!(d.specialty, "Pediatrics", "{a} + {b} at age {age}");
            assert_eq!(d.urgency, Urgency::Medium);
        }
    }
}

/// "child" / "infant" / "baby" trigger the pediatric rule for adults too.
#[test]
fn pediatric_keywords_trigger_for_any_age() {
    let engine = TriageEngine::builtin(1).unwrap();
    for keyword in ["child", "Infant", "BABY"] {
        let d = engine.classify(&set(&[keyword, "rash"]), 40);
        assert_eq!(d.specialty, "Pediatrics");
    }
}

/// Neurological symptoms outrank the age-based pediatric override.
#[test]
fn neurological_symptoms_outrank_pediatric_override() {
    let engine = TriageEngine::builtin(1).unwrap();
    let d = engine.classify(&set(&["seizure"]), 6);
    assert_eq!(d.urgency, Urgency::High);
    assert_eq!(d.specialty, "Neurology");
    assert_eq!(d.priority, 8);
}

/// Respiratory distress is an emergency even for children.
#[test]
fn respiratory_distress_is_an_emergency() {
    let engine = TriageEngine::builtin(1).unwrap();
    for age in [4, 45] {
        let d = engine.classify(&set(&["wheezing", "fever", "cough"]), age);
        assert_eq!(d.urgency, Urgency::Emergency);
        assert_eq!(d.priority, 9);
        assert_eq!(d.specialty, "Respiratory Medicine");
    }
}

/// Every rule outcome respects Emergency > High > Medium > Low on priority.
#[test]
fn priorities_strictly_follow_urgency_order() {
    let config = CatalogConfig::builtin();
    let outcomes: Vec<_> = config.rules.outcomes().collect();
    for a in &outcomes {
        for b in &outcomes {
            if a.urgency < b.urgency {
                assert!(
                    a.priority > b.priority,
                    "{} ({:?}, {}) must outrank {} ({:?}, {})",
                    a.disease, a.urgency, a.priority, b.disease, b.urgency, b.priority
                );
            }
        }
    }
    for o in &outcomes {
        let band = match o.urgency {
            Urgency::Emergency => 9..=10,
            Urgency::High => 7..=8,
            Urgency::Medium => 4..=6,
            Urgency::Low => 0..=3,
        };
        assert!(band.contains(&o.priority), "{} priority {} outside band", o.disease, o.priority);
    }
}

/// Identical input always yields an identical diagnosis.
#[test]
fn classification_is_deterministic() {
    let a = TriageEngine::builtin(1).unwrap();
    let b = TriageEngine::builtin(999).unwrap();
    let vocab = all_symptoms();
    for (i, s) in vocab.iter().enumerate() {
        let symptoms = set(&[s, vocab[(i * 3 + 1) % vocab.len()]]);
        for age in [3, 30, 80] {
            let first = a.classify(&symptoms, age);
            assert_eq!(first, a.classify(&symptoms, age));
            assert_eq!(first, b.classify(&symptoms, age));
        }
    }
}

/// Fever with cough in an adult is a medium-urgency respiratory infection.
#[test]
fn fever_and_cough_is_respiratory_infection() {
    let engine = TriageEngine::builtin(1).unwrap();
    let d = engine.classify(&set(&["fever", "cough"]), 30);
    assert_eq!(d.urgency, Urgency::Medium);
    assert_eq!(d.priority, 5);
    assert_eq!(d.specialty, "General Medicine");
    assert_eq!(d.disease, "Respiratory Infection");
    assert_eq!(d.doctor, "Dr. Emily Davis");
}

/// Fever alone does not satisfy the fever-and-cough pair rule.
#[test]
fn pair_rule_needs_both_symptoms() {
    let engine = TriageEngine::builtin(1).unwrap();
    let d = engine.classify(&set(&["fever"]), 30);
    assert_eq!(d.disease, "General Checkup");
    assert_eq!(d.urgency, Urgency::Low);
}

/// The first matching rule wins: vomiting (GI) beats joint pain (MSK).
#[test]
fn first_matching_rule_wins() {
    let engine = TriageEngine::builtin(1).unwrap();
    let c = engine.explain(&set(&["joint pain", "vomiting", "rash"]), 50);
    assert_eq!(c.matched_rule.as_deref(), Some("gastrointestinal"));
    assert_eq!(c.diagnosis.priority, 7);
}

/// Reordering the catalog changes the outcome.
#[test]
fn rule_order_is_significant() {
    let mut config = CatalogConfig::builtin();
    let gi = config
        .rules
        .rules
        .iter()
        .position(|r| r.name == "gastrointestinal")
        .unwrap();
    let msk = config
        .rules
        .rules
        .iter()
        .position(|r| r.name == "musculoskeletal")
        .unwrap();
    config.rules.rules.swap(gi, msk);
    let engine = TriageEngine::new(&config, 1).unwrap();
    let c = engine.explain(&set(&["joint pain", "vomiting"]), 50);
    assert_eq!(c.matched_rule.as_deref(), Some("musculoskeletal"));
}

/// Unknown symptoms fall through to the general checkup default.
#[test]
fn unknown_symptoms_fall_back_to_general_checkup() {
    let engine = TriageEngine::builtin(1).unwrap();
    let c = engine.explain(&set(&["hiccups", "chest"]), 40);
    assert_eq!(c.matched_rule, None);
    assert_eq!(c.diagnosis.disease, "General Checkup");
    assert_eq!(c.diagnosis.priority, 3);
    assert_eq!(c.diagnosis.specialty, "General Medicine");
}
