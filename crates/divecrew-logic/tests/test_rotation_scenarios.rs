//! Integration tests for the rotation pipeline.
//!
//! Exercises: calendar → cycle model → assignment rules → resolution,
//! on the reference crew used throughout the scheduling docs.
//!
//! All tests are pure logic with no directory and no store.

use chrono::NaiveDate;
use divecrew_logic::calendar::{week_anchor, WeekAnchor};
use divecrew_logic::constants::{Boat, Position, PositionSkill};
use divecrew_logic::crew::{CrewId, CrewMember, Roster, Training};
use divecrew_logic::cycle::compute_cycle_week;
use divecrew_logic::resolution::{resolve, reset_assignment, Resolution, ResetPrompt};
use divecrew_logic::rules::{propose_assignment, Ineligibility, Proposal, ProposedAssignment};
use divecrew_logic::schedule::{Assignment, WeekSchedule};
use divecrew_logic::ScheduleError;

// ── Helpers ────────────────────────────────────────────────────────────

const X: CrewId = 1;
const Y: CrewId = 2;
const Z: CrewId = 3;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week(y: i32, m: u32, d: u32) -> WeekAnchor {
    week_anchor(date(y, m, d))
}

/// X: Saturday start 2024-01-06, 4-week cycle, fully trained.
/// Y: fully trained. Z: trained only as chef, on every boat.
fn roster() -> Roster {
    Roster::new(vec![
        CrewMember::new(X, "Xavier", "Moss", Some(date(2024, 1, 6)), 4)
            .with_training(Training::all()),
        CrewMember::new(Y, "Yara", "Penn", Some(date(2024, 1, 6)), 6)
            .with_training(Training::all()),
        CrewMember::new(Z, "Zoe", "Quill", Some(date(2024, 1, 6)), 4).with_training(
            Training::new()
                .with_position(PositionSkill::Chef)
                .with_boat(Boat::CatPpalu)
                .with_boat(Boat::MorningStar)
                .with_boat(Boat::SeaExplorer),
        ),
    ])
}

fn assign(
    roster: &Roster,
    target: WeekAnchor,
    current: &WeekSchedule,
    previous: &WeekSchedule,
    boat: Boat,
    position: Position,
    crew: CrewId,
) -> Result<ProposedAssignment, ScheduleError> {
    match propose_assignment(roster, target, current, previous, boat, position, Some(crew))? {
        Proposal::Assign(p) => Ok(p),
        Proposal::Unassign(_) => panic!("crew was given, expected an assignment"),
    }
}

/// Assign against an empty target week with nobody on duty the week before.
fn assign_fresh(
    roster: &Roster,
    target: WeekAnchor,
    boat: Boat,
    position: Position,
    crew: CrewId,
) -> Result<ProposedAssignment, ScheduleError> {
    assign(roster, target, &WeekSchedule::new(), &WeekSchedule::new(), boat, position, crew)
}

fn on_duty(roster: &Roster, crew: CrewId, week_in_cycle: u32) -> WeekSchedule {
    let mut s = WeekSchedule::new();
    s.set(
        Boat::MorningStar,
        Position::Engineer,
        Assignment::snapshot(roster.get(crew).unwrap(), week_in_cycle),
    );
    s
}

// ── Cycle arithmetic ───────────────────────────────────────────────────

#[test]
fn last_week_of_cycle() {
    let r = roster();
    let cw = compute_cycle_week(r.get(X).unwrap(), week(2024, 1, 27)).unwrap();
    assert_eq!(cw.week_in_cycle, 4);
    assert!(!cw.is_overage);
}

#[test]
fn first_week_past_cycle() {
    let r = roster();
    let cw = compute_cycle_week(r.get(X).unwrap(), week(2024, 2, 3)).unwrap();
    assert_eq!(cw.week_in_cycle, 5);
    assert!(cw.is_overage);
}

// ── Gap at the boundary auto-resets ────────────────────────────────────

#[test]
fn auto_reset_when_off_last_week() {
    let r = roster();
    let target = week(2024, 2, 3);
    let p = assign_fresh(&r, target, Boat::CatPpalu, Position::Captain, X).unwrap();
    assert!(!p.scheduled_last_week);
    assert_eq!(resolve(&p), Resolution::AutoReset);

    let recorded = reset_assignment(&p);
    assert_eq!(recorded.week, 1);
    assert_eq!(recorded.cycle_count, "1/4");
}

// ── Overdue while on duty needs a human ────────────────────────────────

#[test]
fn pending_confirmation_when_on_duty_last_week() {
    let r = roster();
    let target = week(2024, 2, 3);
    let previous = on_duty(&r, X, 4);
    let current = WeekSchedule::new();
    let p = assign(&r, target, &current, &previous, Boat::CatPpalu, Position::Captain, X).unwrap();
    assert!(p.scheduled_last_week);
    assert_eq!(resolve(&p), Resolution::PendingConfirmation);

    let prompt = ResetPrompt::from_proposal(&p);
    assert_eq!(prompt.current_week, 5);
    assert_eq!(prompt.cycle_length, 4);

    // Declined: recorded as computed and flagged
    let kept = p.as_computed();
    assert_eq!(kept.week, 5);
    assert!(kept.is_overage);
    assert_eq!(kept.cycle_count, "5/4");
}

// ── Double booking ─────────────────────────────────────────────────────

#[test]
fn already_assigned_elsewhere_same_week() {
    let r = roster();
    let target = week(2024, 1, 13);
    let mut current = WeekSchedule::new();
    current.set(Boat::MorningStar, Position::Chef, Assignment::snapshot(r.get(Y).unwrap(), 2));

    let previous = WeekSchedule::new();
    let err = assign(&r, target, &current, &previous, Boat::CatPpalu, Position::Captain, Y)
        .unwrap_err();
    assert_eq!(
        err,
        ScheduleError::AlreadyAssigned {
            crew_id: Y,
            week: target,
            boat: Boat::MorningStar,
            position: Position::Chef,
        }
    );
}

#[test]
fn reassigning_same_slot_is_allowed() {
    let r = roster();
    let target = week(2024, 1, 13);
    let mut current = WeekSchedule::new();
    current.set(Boat::MorningStar, Position::Chef, Assignment::snapshot(r.get(Y).unwrap(), 2));
    let previous = WeekSchedule::new();
    assert!(assign(&r, target, &current, &previous, Boat::MorningStar, Position::Chef, Y).is_ok());
}

// ── Training gates ─────────────────────────────────────────────────────

#[test]
fn untrained_position_rejected() {
    let r = roster();
    let err =
        assign_fresh(&r, week(2024, 1, 13), Boat::CatPpalu, Position::Captain, Z).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::NotEligible {
            crew_id: Z,
            reason: Ineligibility::NotTrainedForPosition(Position::Captain),
        }
    );
}

#[test]
fn extra_needs_no_training() {
    let r = roster();
    let p = assign_fresh(&r, week(2024, 1, 13), Boat::CatPpalu, Position::Extra, Z).unwrap();
    assert_eq!(p.week_in_cycle(), 2);
    assert_eq!(resolve(&p), Resolution::Normal);
}

// ── Mid-week starts ────────────────────────────────────────────────────

#[test]
fn mid_week_start_ineligible_until_next_saturday() {
    let late = CrewMember::new(10, "Lee", "Tran", Some(date(2024, 1, 9)), 3)
        .with_training(Training::all());
    let r = Roster::new(vec![late]);
    let err =
        assign_fresh(&r, week(2024, 1, 6), Boat::SeaExplorer, Position::Extra, 10).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::NotEligible {
            reason: Ineligibility::NotStarted { .. },
            ..
        }
    ));

    let p = assign_fresh(&r, week(2024, 1, 13), Boat::SeaExplorer, Position::Extra, 10).unwrap();
    assert_eq!(p.week_in_cycle(), 1);
}
