//! desk-runner: headless driver for the triage desk.
//!
//! Usage:
//!   desk-runner --seed 7 --patients 40 --db desk.db
//!   desk-runner --data-dir ./data --week-start 2025-12-01
//!   desk-runner --ipc-mode            (JSON lines on stdin/stdout)

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use std::env;
use std::io::{self, BufRead, Write};
use triage_core::{
    admission::AdmissionDesk,
    bed_pool::Bed,
    config::CatalogConfig,
    engine::TriageEngine,
    error::DeskResult,
    intake::RawIntake,
    name_generator::NameGenerator,
    rng::{RngBank, RngStream},
    roster::{FitnessMetrics, WeeklyRoster},
    store::{DeskStatistics, HospitalStore},
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Admit {
        intake: RawIntake,
        #[serde(default)]
        at: Option<NaiveDateTime>,
    },
    Roster {
        week_start: NaiveDate,
    },
    Discharge {
        allocation_id: i64,
    },
    Stats,
    Quit,
}

#[derive(serde::Serialize)]
struct DeskState {
    statistics: DeskStatistics,
    beds: Vec<Bed>,
}

#[derive(serde::Serialize)]
struct RosterReply {
    roster: WeeklyRoster,
    metrics: FitnessMetrics,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let patients = parse_arg(&args, "--patients", 12usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir");

    let now = Local::now().naive_local();
    let week_start = match flag_value(&args, "--week-start") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--week-start expects YYYY-MM-DD, got '{raw}'"))?,
        None => monday_of(now.date()),
    };

    if !ipc_mode {
        println!("Triage Desk: desk-runner");
        println!("  seed:       {seed}");
        println!("  patients:   {patients}");
        println!("  db:         {db}");
        println!("  data_dir:   {}", data_dir.unwrap_or("(builtin)"));
        println!("  week_start: {week_start}");
        println!();
    }

    let config = match data_dir {
        Some(dir) => CatalogConfig::load(dir)?,
        None => CatalogConfig::builtin(),
    };

    let store = if db == ":memory:" {
        HospitalStore::in_memory()?
    } else {
        HospitalStore::open(db)?
    };
    store.migrate()?;
    store.seed_doctors(&config.doctors)?;

    let engine = TriageEngine::new(&config, seed)?;
    let desk = AdmissionDesk::new(&engine, &store);
    // An existing database may already hold occupied beds.
    desk.restore_occupancy()?;

    if ipc_mode {
        run_ipc_loop(&desk, &engine, &store)?;
    } else {
        admit_synthetic(&desk, seed, patients, now)?;
        let (roster, metrics) = desk.plan_week(week_start, now)?;
        print_summary(&engine, &store, &roster, &metrics, now.date())?;
    }

    Ok(())
}

fn admit_synthetic(
    desk: &AdmissionDesk<'_>,
    seed: u64,
    patients: usize,
    now: NaiveDateTime,
) -> Result<()> {
    let mut rng = RngBank::new(seed).for_stream(RngStream::SyntheticIntake);
    for i in 0..patients {
        let raw = NameGenerator::generate_intake(&mut rng);
        let at = now + Duration::minutes(5 * i as i64);
        let out = desk.admit(&raw, at)?;
        let d = &out.classification.diagnosis;
        println!(
            "  {:<22} {:>3}  {:<9} {:<24} {:<14} {} → {}",
            raw.name,
            raw.age,
            d.urgency.as_str(),
            d.disease,
            out.appointment.room,
            out.appointment.scheduled_at.format("%a %H:%M"),
            out.bed.placement.id(),
        );
    }
    println!();
    Ok(())
}

fn run_ipc_loop(
    desk: &AdmissionDesk<'_>,
    engine: &TriageEngine,
    store: &HospitalStore,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let now = Local::now().naive_local();
        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Admit { intake, at } => to_reply(desk.admit(&intake, at.unwrap_or(now))),
            IpcCommand::Roster { week_start } => to_reply(
                desk.plan_week(week_start, now)
                    .map(|(roster, metrics)| RosterReply { roster, metrics }),
            ),
            IpcCommand::Discharge { allocation_id } => {
                to_reply(desk.discharge(allocation_id, now))
            }
            IpcCommand::Stats => to_reply(store.statistics(now.date()).map(|statistics| {
                DeskState {
                    statistics,
                    beds: engine.bed_pool().snapshot(),
                }
            })),
        };

        // Failed commands (bad input, unknown ids, unserializable replies)
        // are reported and the loop goes on.
        match reply {
            Ok(value) => writeln!(stdout, "{value}")?,
            Err(e) => {
                log::warn!("ipc command failed: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Turn a desk result into the JSON line to send back.
fn to_reply<T: serde::Serialize>(result: DeskResult<T>) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(result?)?)
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_summary(
    engine: &TriageEngine,
    store: &HospitalStore,
    roster: &WeeklyRoster,
    metrics: &FitnessMetrics,
    today: NaiveDate,
) -> Result<()> {
    let stats = store.statistics(today)?;

    println!("=== DESK SUMMARY ===");
    println!("  patients:          {}", stats.total_patients);
    println!("  appointments:      {}", stats.total_appointments);
    println!("  occupied beds:     {}", stats.occupied_beds);
    println!("  waitlisted:        {}", stats.waitlisted_cases);
    println!("  emergencies today: {}", stats.emergency_cases_today);

    println!();
    println!("=== BEDS ===");
    for bed in engine.bed_pool().snapshot() {
        let state = if bed.available { "free" } else { "occupied" };
        println!("  {:<8} {:<16} {state}", bed.id, bed.ward);
    }

    println!();
    println!("=== ROSTER (week of {}) ===", roster.week_start);
    for day in roster.days() {
        let cells: Vec<String> = day
            .iter()
            .map(|e| format!("{} ({})", e.doctor, e.patient_count))
            .collect();
        if let Some(first) = day.first() {
            println!("  {:<10} {}", first.day, cells.join(" | "));
        }
    }
    println!(
        "  cost: ${:.2} | revenue: ${:.2} | profit: ${:.2} | avg load: {:.2}",
        metrics.total_cost, metrics.total_revenue, metrics.profit, metrics.avg_patients_per_shift
    );
    Ok(())
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
