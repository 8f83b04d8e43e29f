//! DiveCrew Headless Scheduling Harness
//!
//! Loads the harness configuration and the sample roster from a scratch
//! directory, then drives scheduling sessions end to end against
//! in-memory collaborators. Nothing is written outside the scratch
//! directory, which is removed on exit.
//!
//! Usage:
//!   cargo run -p divecrew-simtest
//!   cargo run -p divecrew-simtest -- --verbose
//!
//! `RUST_LOG` overrides the log filter chosen by `--verbose`.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use divecrew_logic::calendar::{week_anchor, weeks_between, weeks_in_range, WeekAnchor};
use divecrew_logic::constants::{Boat, Position, ANCHOR_WEEKDAY};
use divecrew_logic::crew::{CrewId, CrewMember};
use divecrew_logic::cycle::{compute_cycle_week, effective_cycle_start};
use divecrew_logic::resolution::{ResetDecision, Resolution};
use divecrew_logic::ScheduleError;
use divecrew_store::config::{load_config, validate_config, SchedulerConfig};
use divecrew_store::import::import_roster;
use divecrew_store::persistence::{load_snapshot_file, save_snapshot_file};
use divecrew_store::{
    AssignOutcome, CrewDirectory, MemoryDirectory, MemoryScheduleStore, ScheduleStore,
    SchedulingSession, SessionError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Fixtures (crew service export format, harness config) ───────────────
const ROSTER_JSON: &str = include_str!("../../../data/sample_roster.json");
const CONFIG_JSON: &str = include_str!("../../../data/scheduler_config.json");

const XAVIER: CrewId = 1;
const YARA: CrewId = 2;
const ZOE: CrewId = 3;
const WEN: CrewId = 4;
const VIC: CrewId = 5;

type Session = SchedulingSession<MemoryDirectory, MemoryScheduleStore>;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Route the `log` records of the scheduling crates to stderr.
fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "error" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    init_logging(verbose);
    println!("=== DiveCrew Scheduling Harness ===\n");

    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("  ✗ scratch_dir: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_fixture_config(scratch.path()) {
        Ok(config) => config,
        Err(e) => {
            println!("  ✗ config_load: {}", e);
            drop(scratch);
            std::process::exit(1);
        }
    };
    results.extend(validate_configuration(&config, verbose));

    // 2. Roster import
    let crew = match import_fixture_roster(&config) {
        Ok(crew) => crew,
        Err(e) => {
            println!("  ✗ roster_parse: {}", e);
            drop(scratch);
            std::process::exit(1);
        }
    };
    results.extend(validate_roster(&crew, verbose));

    // 3. Calendar arithmetic
    results.extend(validate_calendar(verbose));

    // 4. Rotation scenarios through a session
    results.extend(validate_rotation(&crew, &config, verbose));

    // 5. Print range and snapshot file
    results.extend(validate_snapshot(&crew, &config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if let Err(e) = scratch.close() {
        log::warn!("could not remove scratch directory: {}", e);
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn week(y: i32, m: u32, d: u32) -> WeekAnchor {
    week_anchor(date(y, m, d))
}

/// Lay the fixtures out in `dir` and load the config from there, so its
/// relative paths point at the copied roster.
fn load_fixture_config(dir: &Path) -> Result<SchedulerConfig, String> {
    fs::write(dir.join("sample_roster.json"), ROSTER_JSON).map_err(|e| e.to_string())?;
    let path = dir.join("scheduler_config.json");
    fs::write(&path, CONFIG_JSON).map_err(|e| e.to_string())?;
    load_config(&path).map_err(|e| e.to_string())
}

fn import_fixture_roster(config: &SchedulerConfig) -> Result<Vec<CrewMember>, String> {
    let path = config
        .roster_import
        .as_deref()
        .ok_or_else(|| "no roster import configured".to_string())?;
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    import_roster(BufReader::new(file)).map_err(|e| e.to_string())
}

fn open_session(
    crew: &[CrewMember],
    store: MemoryScheduleStore,
    config: &SchedulerConfig,
) -> Result<Session, String> {
    let directory = MemoryDirectory::with_crew(crew.to_vec()).map_err(|e| e.to_string())?;
    SchedulingSession::open(directory, store, date(2024, 1, 6))
        .map(|s| s.with_past_week_lock(config.lock_past_weeks))
        .map_err(|e| e.to_string())
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &SchedulerConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let errors = validate_config(config);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: format!("{:?}", errors),
    });

    let roster_found = config.roster_import.as_deref().is_some_and(Path::exists);
    results.push(TestResult {
        name: "config_paths_resolved".into(),
        passed: roster_found && config.snapshot_path.is_absolute(),
        detail: format!("snapshot at {}", config.snapshot_path.display()),
    });

    let (first, last) = config.print_range(date(2024, 1, 10));
    let span = weeks_in_range(first, last).len();
    results.push(TestResult {
        name: "config_print_range".into(),
        passed: first == date(2024, 1, 6) && span == config.print_range_weeks as usize,
        detail: format!("{} to {} ({} weeks)", first, last, span),
    });

    let defaults = validate_config(&SchedulerConfig::default());
    results.push(TestResult {
        name: "default_config_valid".into(),
        passed: defaults.is_empty(),
        detail: format!("{:?}", defaults),
    });

    if verbose {
        println!(
            "    lock past weeks: {}, print range: {} weeks",
            config.lock_past_weeks, config.print_range_weeks
        );
    }

    results
}

// ── 2. Roster ───────────────────────────────────────────────────────────

fn validate_roster(crew: &[CrewMember], verbose: bool) -> Vec<TestResult> {
    println!("--- Roster Import ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "roster_count".into(),
        passed: crew.len() == 5,
        detail: format!("{} crew imported", crew.len()),
    });

    let ids: Vec<CrewId> = crew.iter().map(|c| c.id).collect();
    results.push(TestResult {
        name: "roster_ids".into(),
        passed: ids == vec![XAVIER, YARA, ZOE, WEN, VIC],
        detail: format!("ids {:?}", ids),
    });

    let yara = crew.iter().find(|c| c.id == YARA);
    results.push(TestResult {
        name: "preferred_name".into(),
        passed: yara.map(|c| c.display_name()) == Some("Yaya".to_string()),
        detail: format!("{:?}", yara.map(|c| c.display_name())),
    });

    let wen = crew.iter().find(|c| c.id == WEN);
    let wen_start = wen.and_then(effective_cycle_start);
    results.push(TestResult {
        name: "midweek_start_rolls_forward".into(),
        passed: wen_start == Some(week(2024, 1, 13)),
        detail: format!("Wen effective start {:?}", wen_start.map(|w| w.to_string())),
    });

    let vic = crew.iter().find(|c| c.id == VIC);
    results.push(TestResult {
        name: "no_cycle_start_never_eligible".into(),
        passed: vic.is_some_and(|c| compute_cycle_week(c, week(2030, 1, 5)).is_none()),
        detail: "Vic has no cycle start".into(),
    });

    if verbose {
        for c in crew {
            println!(
                "    {:>2} {:<16} cycle {:>2}w from {}",
                c.id,
                c.display_name(),
                c.cycle_length_weeks,
                c.cycle_start.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
            );
        }
    }

    results
}

// ── 3. Calendar ─────────────────────────────────────────────────────────

fn validate_calendar(_verbose: bool) -> Vec<TestResult> {
    println!("--- Calendar ---");
    let mut results = Vec::new();

    // Every day of a fortnight anchors to a Saturday at or before it
    let start = date(2024, 2, 26);
    let all_anchor = (0..14u64).all(|i| {
        let d = start + chrono::Days::new(i);
        let w = week_anchor(d).date();
        chrono::Datelike::weekday(&w) == ANCHOR_WEEKDAY && w <= d && (d - w).num_days() < 7
    });
    results.push(TestResult {
        name: "anchor_weekday".into(),
        passed: all_anchor,
        detail: format!("anchored to {:?}", ANCHOR_WEEKDAY),
    });

    let span = weeks_between(week(2024, 1, 6), week(2024, 12, 28));
    results.push(TestResult {
        name: "weeks_between_year".into(),
        passed: span == 51,
        detail: format!("{} weeks", span),
    });

    let range = weeks_in_range(date(2024, 1, 3), date(2024, 1, 31));
    results.push(TestResult {
        name: "print_range".into(),
        passed: range.len() == 5 && range.first() == Some(&week(2023, 12, 30)),
        detail: format!("{} weeks in range", range.len()),
    });

    results
}

// ── 4. Rotation ─────────────────────────────────────────────────────────

fn validate_rotation(
    crew: &[CrewMember],
    config: &SchedulerConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Rotation Scenarios ---");
    let mut results = Vec::new();

    // Xavier off the week before the overage: silent reset
    match open_session(crew, MemoryScheduleStore::new(), config).and_then(|mut s| {
        s.assign(week(2024, 2, 3), Boat::CatPpalu, Position::Captain, Some(XAVIER))
            .map_err(|e| e.to_string())
            .map(|out| (out, s))
    }) {
        Ok((AssignOutcome::Recorded { assignment, resolution }, s)) => {
            let new_start = s.directory().get(XAVIER).ok().and_then(|c| c.cycle_start);
            results.push(TestResult {
                name: "auto_reset".into(),
                passed: resolution == Resolution::AutoReset
                    && assignment.week == 1
                    && new_start == Some(date(2024, 2, 3)),
                detail: format!(
                    "{:?}, {}, start now {:?}",
                    resolution, assignment.cycle_count, new_start
                ),
            });
        }
        other => results.push(failure("auto_reset", other.map(|(o, _)| o))),
    }

    // Xavier on duty the week before: needs a decision
    let mut store = MemoryScheduleStore::new();
    match open_session(crew, MemoryScheduleStore::new(), config).and_then(|mut s| {
        s.assign(week(2024, 1, 27), Boat::CatPpalu, Position::Captain, Some(XAVIER))
            .and_then(|_| s.save_all())
            .map_err(|e| e.to_string())?;
        Ok(s.into_parts().1)
    }) {
        Ok(seeded) => store = seeded,
        Err(e) => results.push(TestResult {
            name: "seed_week".into(),
            passed: false,
            detail: e,
        }),
    }

    for (decision, expected_week) in [(ResetDecision::KeepAsIs, 5), (ResetDecision::Reset, 1)] {
        let name = format!("confirm_{:?}", decision).to_lowercase();
        let outcome = open_session(crew, store.clone(), config).and_then(|mut s| {
            let out = s
                .assign(week(2024, 2, 3), Boat::MorningStar, Position::Captain, Some(XAVIER))
                .map_err(|e| e.to_string())?;
            let prompt = match out {
                AssignOutcome::NeedsConfirmation(prompt) => prompt,
                other => return Err(format!("expected a prompt, got {:?}", other)),
            };
            if verbose {
                println!("    prompt: {}", prompt.message());
            }
            s.confirm(&prompt, decision).map_err(|e| e.to_string())
        });
        results.push(match outcome {
            Ok(a) => TestResult {
                name,
                passed: a.week == expected_week && a.is_overage == (expected_week == 5),
                detail: format!("recorded {} (overage: {})", a.cycle_count, a.is_overage),
            },
            Err(e) => TestResult {
                name,
                passed: false,
                detail: e,
            },
        });
    }

    // Weeks before the session's current week
    match open_session(crew, MemoryScheduleStore::new(), config) {
        Ok(mut s) => {
            let earlier = s.current_week().previous();
            let out = s.assign(earlier, Boat::CatPpalu, Position::Extra, Some(XAVIER));
            let locked = matches!(
                out,
                Err(SessionError::Rejected(ScheduleError::PastWeekLocked { .. }))
            );
            results.push(TestResult {
                name: "past_week_lock".into(),
                passed: locked == config.lock_past_weeks,
                detail: format!(
                    "lock {}: {:?}",
                    config.lock_past_weeks,
                    out.err().map(|e| e.to_string())
                ),
            });
        }
        Err(e) => results.push(failure::<()>("past_week_lock", Err(e))),
    }

    // Rejections
    match open_session(crew, MemoryScheduleStore::new(), config) {
        Ok(mut s) => {
            let w = week(2024, 1, 13);
            let first = s.assign(w, Boat::SeaExplorer, Position::Chef, Some(YARA));
            let second = s.assign(w, Boat::CatPpalu, Position::Captain, Some(YARA));
            results.push(TestResult {
                name: "double_booking_rejected".into(),
                passed: first.is_ok()
                    && matches!(
                        second,
                        Err(SessionError::Rejected(ScheduleError::AlreadyAssigned { .. }))
                    ),
                detail: format!("{:?}", second.err().map(|e| e.to_string())),
            });

            let captain = s.assign(w, Boat::CatPpalu, Position::Captain, Some(ZOE));
            let extra = s.assign(w, Boat::CatPpalu, Position::Extra, Some(ZOE));
            results.push(TestResult {
                name: "training_gate".into(),
                passed: matches!(
                    captain,
                    Err(SessionError::Rejected(ScheduleError::NotEligible { .. }))
                ) && extra.is_ok(),
                detail: format!("captain: {:?}", captain.err().map(|e| e.to_string())),
            });

            let early =
                s.assign(week(2024, 1, 6), Boat::SeaExplorer, Position::Divemaster, Some(WEN));
            let on_time = s.assign(w, Boat::SeaExplorer, Position::Divemaster, Some(WEN));
            results.push(TestResult {
                name: "join_week_gate".into(),
                passed: early.is_err() && on_time.is_ok(),
                detail: format!("before start: {:?}", early.err().map(|e| e.to_string())),
            });

            let double_booked = s.week(w).map(|sched| sched.double_booked()).unwrap_or_default();
            results.push(TestResult {
                name: "no_double_booking".into(),
                passed: double_booked.is_empty(),
                detail: format!("{} slots filled", s.week(w).map_or(0, |sched| sched.len())),
            });
        }
        Err(e) => results.push(TestResult {
            name: "open_session".into(),
            passed: false,
            detail: e,
        }),
    }

    results
}

fn failure<T: std::fmt::Debug>(name: &str, outcome: Result<T, String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed: false,
        detail: match outcome {
            Ok(o) => format!("unexpected outcome {:?}", o),
            Err(e) => e,
        },
    }
}

// ── 5. Snapshot ─────────────────────────────────────────────────────────

fn validate_snapshot(
    crew: &[CrewMember],
    config: &SchedulerConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Print Range & Snapshot ---");
    let mut results = Vec::new();
    let (first, last) = config.print_range(date(2024, 1, 13));

    let outcome = open_session(crew, MemoryScheduleStore::new(), config).and_then(|mut s| {
        for (i, w) in weeks_in_range(first, last).into_iter().enumerate() {
            let boat = Boat::ALL[i % Boat::ALL.len()];
            let out = s
                .assign(w, boat, Position::Chef, Some(YARA))
                .map_err(|e| e.to_string())?;
            // A long print range runs Yara past her cycle; keep her on
            if let AssignOutcome::NeedsConfirmation(prompt) = out {
                s.confirm(&prompt, ResetDecision::KeepAsIs)
                    .map_err(|e| e.to_string())?;
            }
        }
        s.save_all().map_err(|e| e.to_string())?;
        let rows = s.print_rows(first, last).map_err(|e| e.to_string())?;
        let (directory, store) = s.into_parts();

        let path = config.snapshot_path.as_path();
        save_snapshot_file(path, &directory, &store).map_err(|e| e.to_string())?;
        let bytes = fs::metadata(path).map(|m| m.len()).map_err(|e| e.to_string())?;
        let (loaded_dir, loaded_store) = load_snapshot_file(path).map_err(|e| e.to_string())?;
        let same_weeks = store.stored_weeks().ok() == loaded_store.stored_weeks().ok();
        let same_crew = directory.list().ok() == loaded_dir.list().ok();
        Ok((rows, bytes, same_weeks && same_crew))
    });

    match outcome {
        Ok((rows, bytes, matches)) => {
            results.push(TestResult {
                name: "print_rows".into(),
                passed: rows.len() == config.print_range_weeks as usize,
                detail: format!("{} rows from {} to {}", rows.len(), first, last),
            });
            results.push(TestResult {
                name: "snapshot_file_roundtrip".into(),
                passed: matches,
                detail: format!("{} bytes", bytes),
            });
            if verbose {
                for r in &rows {
                    println!(
                        "    {} {:<12} {:<10} {:<14} {}",
                        r.week_start, r.boat, r.position, r.crew, r.cycle
                    );
                }
            }
        }
        Err(e) => results.push(TestResult {
            name: "snapshot".into(),
            passed: false,
            detail: e,
        }),
    }

    results
}
