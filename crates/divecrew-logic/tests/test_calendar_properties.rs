//! Property tests for week arithmetic, the cycle model and the
//! single-booking rule.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use divecrew_logic::calendar::{week_anchor, weeks_between};
use divecrew_logic::constants::{Boat, Position};
use divecrew_logic::crew::{CrewMember, Roster, Training};
use divecrew_logic::cycle::{compute_cycle_week, effective_cycle_start, has_started_by};
use divecrew_logic::rules::{propose_assignment, Proposal};
use divecrew_logic::schedule::WeekSchedule;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any date within roughly fifty years of 2000-01-01.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (-9_000i64..9_000)
        .prop_map(|offset| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset))
}

fn arb_slot() -> impl Strategy<Value = (Boat, Position)> {
    (0usize..Boat::ALL.len(), 0usize..Position::ALL.len())
        .prop_map(|(b, p)| (Boat::ALL[b], Position::ALL[p]))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn anchor_is_idempotent(d in arb_date()) {
        let once = week_anchor(d);
        prop_assert_eq!(week_anchor(once.date()), once);
        prop_assert_eq!(once.date().weekday(), Weekday::Sat);
        prop_assert!(once.date() <= d);
        prop_assert!((d - once.date()).num_days() < 7);
    }

    #[test]
    fn weeks_between_is_additive(a in arb_date(), b in arb_date(), c in arb_date()) {
        let (a, b, c) = (week_anchor(a), week_anchor(b), week_anchor(c));
        prop_assert_eq!(weeks_between(a, b) + weeks_between(b, c), weeks_between(a, c));
    }

    #[test]
    fn shifting_round_trips(d in arb_date(), n in -500i64..500) {
        let w = week_anchor(d);
        prop_assert_eq!(weeks_between(w, w.add_weeks(n)), n);
        prop_assert_eq!(w.add_weeks(n).sub_weeks(n), w);
    }

    #[test]
    fn anchored_start_is_week_one(d in arb_date(), len in 1u32..20) {
        let start = week_anchor(d).date();
        let crew = CrewMember::new(1, "A", "B", Some(start), len);
        let cw = compute_cycle_week(&crew, week_anchor(start)).unwrap();
        prop_assert_eq!(cw.week_in_cycle, 1);
        prop_assert!(!cw.is_overage);
    }

    #[test]
    fn mid_week_start_counts_from_next_anchor(d in arb_date(), len in 1u32..20) {
        prop_assume!(d.weekday() != Weekday::Sat);
        let crew = CrewMember::new(1, "A", "B", Some(d), len);
        let effective = effective_cycle_start(&crew).unwrap();
        prop_assert_eq!(effective.date().weekday(), Weekday::Sat);
        prop_assert!(effective.date() > d);
        prop_assert!((effective.date() - d).num_days() < 7);
        prop_assert!(!has_started_by(&crew, effective.previous()));
        prop_assert!(has_started_by(&crew, effective));
    }

    #[test]
    fn overage_iff_past_cycle_length(d in arb_date(), len in 1u32..20, ahead in 0i64..60) {
        let start = week_anchor(d);
        let crew = CrewMember::new(1, "A", "B", Some(start.date()), len);
        let cw = compute_cycle_week(&crew, start.add_weeks(ahead)).unwrap();
        prop_assert_eq!(cw.week_in_cycle, ahead + 1);
        prop_assert_eq!(cw.is_overage, ahead + 1 > i64::from(len));
    }

    #[test]
    fn accepted_assignments_never_double_book(
        requests in prop::collection::vec((0u64..6, arb_slot()), 1..40)
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let roster = Roster::new((0u64..6).map(|id| {
            CrewMember::new(id, "Crew", id.to_string(), Some(start), 8)
                .with_training(Training::all())
        }));
        let target = week_anchor(start).add_weeks(2);
        let previous = WeekSchedule::new();
        let mut current = WeekSchedule::new();

        for (crew_id, (boat, position)) in requests {
            let proposal = propose_assignment(
                &roster,
                target,
                &current,
                &previous,
                boat,
                position,
                Some(crew_id),
            );
            if let Ok(Proposal::Assign(p)) = proposal {
                current.set(boat, position, p.as_computed());
            }
            prop_assert!(current.double_booked().is_empty());
        }
    }
}
