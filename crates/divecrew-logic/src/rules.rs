//! Assignment eligibility rules.
//!
//! The same predicate populates the candidate list for a slot and
//! validates a direct assignment request, so what the scheduler is
//! offered and what the core accepts can never disagree.
//!
//! A crew member may fill (boat, position) in a week when all hold:
//!
//! | gate | rule |
//! |------|------|
//! | single booking | holds no *other* slot that week (same slot is fine) |
//! | position | trained for the position's skill (EXTRA needs none) |
//! | boat | trained for the boat |
//! | started | rotation has begun by that week |
//!
//! [`propose_assignment`] computes the cycle position of an accepted
//! request but does not decide what to do about an overage; see
//! [`crate::resolution`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::WeekAnchor;
use crate::constants::{Boat, Position};
use crate::crew::{CrewId, CrewMember, Roster};
use crate::cycle::{compute_cycle_week, effective_cycle_start, has_started_by, CycleWeek};
use crate::error::ScheduleError;
use crate::schedule::{Assignment, SlotKey, WeekSchedule};

/// Why a crew member cannot fill a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Ineligibility {
    #[error("already holds {} {}", .0.boat.label(), .0.position.label())]
    AlreadyAssigned(SlotKey),
    #[error("not trained for {}", .0.label())]
    NotTrainedForPosition(Position),
    #[error("not trained for {}", .0.label())]
    NotTrainedForBoat(Boat),
    #[error("rotation has not started (first week: {})", display_start(.effective_start))]
    NotStarted { effective_start: Option<WeekAnchor> },
}

fn display_start(start: &Option<WeekAnchor>) -> String {
    match start {
        Some(w) => w.to_string(),
        None => "unset".to_string(),
    }
}

/// Check every gate for `crew` filling (boat, position) in `week`.
///
/// `schedule` is that week's current assignments.
pub fn check_eligibility(
    crew: &CrewMember,
    week: WeekAnchor,
    schedule: &WeekSchedule,
    boat: Boat,
    position: Position,
) -> Result<(), Ineligibility> {
    if let Some(held) = schedule.slot_of(crew.id) {
        if held != (SlotKey { boat, position }) {
            return Err(Ineligibility::AlreadyAssigned(held));
        }
    }
    if !crew.training.can_fill(position) {
        return Err(Ineligibility::NotTrainedForPosition(position));
    }
    if !crew.training.can_crew(boat) {
        return Err(Ineligibility::NotTrainedForBoat(boat));
    }
    if !has_started_by(crew, week) {
        return Err(Ineligibility::NotStarted {
            effective_start: effective_cycle_start(crew),
        });
    }
    Ok(())
}

/// Whether `crew` may fill (boat, position) in `week`.
pub fn is_eligible(
    crew: &CrewMember,
    week: WeekAnchor,
    schedule: &WeekSchedule,
    boat: Boat,
    position: Position,
) -> bool {
    check_eligibility(crew, week, schedule, boat, position).is_ok()
}

/// Crew that may be offered for (boat, position) in `week`, in roster order.
pub fn eligible_candidates<'a>(
    roster: &'a Roster,
    week: WeekAnchor,
    schedule: &WeekSchedule,
    boat: Boat,
    position: Position,
) -> Vec<&'a CrewMember> {
    roster
        .iter()
        .filter(|c| is_eligible(c, week, schedule, boat, position))
        .collect()
}

/// An accepted request to put a crew member in a slot, before overage
/// disposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedAssignment {
    pub week: WeekAnchor,
    pub slot: SlotKey,
    /// Crew record the proposal was computed from.
    pub crew: CrewMember,
    pub cycle: CycleWeek,
    /// Held any slot in the week immediately before `week`.
    pub scheduled_last_week: bool,
}

impl ProposedAssignment {
    /// Week-in-cycle as computed. Always at least 1 for an eligible crew member.
    pub fn week_in_cycle(&self) -> u32 {
        u32::try_from(self.cycle.week_in_cycle.max(0)).unwrap_or(u32::MAX)
    }

    /// The assignment recorded as computed (flagged if over cycle).
    pub fn as_computed(&self) -> Assignment {
        Assignment::snapshot(&self.crew, self.week_in_cycle())
    }
}

/// Outcome of a proposal that passed the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// No crew given: clear the slot.
    Unassign(SlotKey),
    Assign(ProposedAssignment),
}

/// Validate a request to put `crew_id` (or nobody) in (boat, position)
/// for `week`.
///
/// `current` is `week`'s assignments; `previous` is the week before,
/// used to tell whether the crew member was on duty last week.
pub fn propose_assignment(
    roster: &Roster,
    week: WeekAnchor,
    current: &WeekSchedule,
    previous: &WeekSchedule,
    boat: Boat,
    position: Position,
    crew_id: Option<CrewId>,
) -> Result<Proposal, ScheduleError> {
    let slot = SlotKey { boat, position };
    let Some(crew_id) = crew_id else {
        return Ok(Proposal::Unassign(slot));
    };

    let crew = roster
        .get(crew_id)
        .ok_or(ScheduleError::UnknownCrew(crew_id))?;
    crew.validate()?;

    if let Err(reason) = check_eligibility(crew, week, current, boat, position) {
        log::debug!("crew {} rejected for {:?} in {}: {}", crew_id, slot, week, reason);
        return Err(match reason {
            Ineligibility::AlreadyAssigned(held) => ScheduleError::AlreadyAssigned {
                crew_id,
                week,
                boat: held.boat,
                position: held.position,
            },
            reason => ScheduleError::NotEligible { crew_id, reason },
        });
    }

    // Eligibility implies a cycle start exists.
    let cycle = compute_cycle_week(crew, week).ok_or(ScheduleError::NotEligible {
        crew_id,
        reason: Ineligibility::NotStarted {
            effective_start: None,
        },
    })?;

    Ok(Proposal::Assign(ProposedAssignment {
        week,
        slot,
        crew: crew.clone(),
        cycle,
        scheduled_last_week: previous.contains_crew(crew_id),
    }))
}

/// Proposal for a manual cycle reset of `holder`, who already occupies
/// `slot` in `week`.
///
/// Only the holder's record is checked. The booking, training and started
/// gates are skipped since the holder is in the slot already, possibly
/// from before a later reset moved their cycle start.
pub fn propose_reset(
    roster: &Roster,
    week: WeekAnchor,
    previous: &WeekSchedule,
    slot: SlotKey,
    holder: CrewId,
) -> Result<ProposedAssignment, ScheduleError> {
    let crew = roster.get(holder).ok_or(ScheduleError::UnknownCrew(holder))?;
    crew.validate()?;
    let cycle = compute_cycle_week(crew, week).unwrap_or(CycleWeek {
        week_in_cycle: 0,
        is_overage: false,
    });
    Ok(ProposedAssignment {
        week,
        slot,
        crew: crew.clone(),
        cycle,
        scheduled_last_week: previous.contains_crew(holder),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::week_anchor;
    use crate::constants::PositionSkill;
    use crate::crew::Training;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![
            CrewMember::new(1, "Ana", "Reyes", Some(date(2024, 1, 6)), 4)
                .with_training(Training::all()),
            CrewMember::new(2, "Ben", "Ola", Some(date(2024, 1, 6)), 4).with_training(
                Training::new()
                    .with_position(PositionSkill::Chef)
                    .with_boat(Boat::MorningStar),
            ),
            // Starts mid-week, first rotation week 2024-01-13
            CrewMember::new(3, "Cai", "Lum", Some(date(2024, 1, 10)), 2)
                .with_training(Training::all()),
            CrewMember::new(4, "Dee", "Noor", None, 4).with_training(Training::all()),
        ])
    }

    fn candidate_ids(
        r: &Roster,
        week: WeekAnchor,
        sched: &WeekSchedule,
        boat: Boat,
        position: Position,
    ) -> Vec<CrewId> {
        eligible_candidates(r, week, sched, boat, position)
            .iter()
            .map(|c| c.id)
            .collect()
    }

    /// Propose against an empty target week and an empty week before it.
    fn propose_fresh(
        r: &Roster,
        week: WeekAnchor,
        boat: Boat,
        position: Position,
        crew_id: Option<CrewId>,
    ) -> Result<Proposal, ScheduleError> {
        let empty = WeekSchedule::new();
        propose_assignment(r, week, &empty, &empty, boat, position, crew_id)
    }

    #[test]
    fn test_candidates_filter_training_and_start() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 6));
        let empty = WeekSchedule::new();
        let ids = candidate_ids(&r, week, &empty, Boat::MorningStar, Position::Chef);
        // 3 has not started yet, 4 never starts
        assert_eq!(ids, vec![1, 2]);

        let ids = candidate_ids(&r, week.next(), &empty, Boat::CatPpalu, Position::Chef);
        // 2 is not trained for Cat Ppalu
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_candidates_exclude_crew_booked_elsewhere() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 13));
        let mut sched = WeekSchedule::new();
        sched.set(Boat::CatPpalu, Position::Captain, Assignment::snapshot(r.get(1).unwrap(), 2));
        let ids = candidate_ids(&r, week, &sched, Boat::SeaExplorer, Position::Extra);
        assert_eq!(ids, vec![3]);
        // Same slot is still offered
        let ana = r.get(1).unwrap();
        assert!(is_eligible(ana, week, &sched, Boat::CatPpalu, Position::Captain));
    }

    #[test]
    fn test_unassign_always_succeeds() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 6));
        let p = propose_fresh(&r, week, Boat::CatPpalu, Position::Chef, None);
        assert_eq!(
            p,
            Ok(Proposal::Unassign(SlotKey {
                boat: Boat::CatPpalu,
                position: Position::Chef
            }))
        );
    }

    #[test]
    fn test_unknown_crew_rejected() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 6));
        let p = propose_fresh(&r, week, Boat::CatPpalu, Position::Chef, Some(99));
        assert_eq!(p, Err(ScheduleError::UnknownCrew(99)));
    }

    #[test]
    fn test_not_started_rejected() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 6));
        let p = propose_fresh(&r, week, Boat::CatPpalu, Position::Extra, Some(3));
        assert!(matches!(
            p,
            Err(ScheduleError::NotEligible {
                crew_id: 3,
                reason: Ineligibility::NotStarted { .. }
            })
        ));
    }

    #[test]
    fn test_proposal_records_last_week_presence() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 20));
        let mut prev = WeekSchedule::new();
        prev.set(Boat::MorningStar, Position::Chef, Assignment::snapshot(r.get(2).unwrap(), 2));
        let current = WeekSchedule::new();
        let p = propose_assignment(
            &r,
            week,
            &current,
            &prev,
            Boat::MorningStar,
            Position::Chef,
            Some(2),
        )
        .unwrap();
        let Proposal::Assign(proposed) = p else {
            panic!("expected an assignment");
        };
        assert!(proposed.scheduled_last_week);
        assert_eq!(proposed.week_in_cycle(), 3);
        assert_eq!(proposed.as_computed().cycle_count, "3/4");
    }

    #[test]
    fn test_invalid_cycle_config_rejected() {
        let r = Roster::new(vec![CrewMember::new(5, "Eve", "Zero", Some(date(2024, 1, 6)), 0)
            .with_training(Training::all())]);
        let week = week_anchor(date(2024, 1, 6));
        let p = propose_fresh(&r, week, Boat::CatPpalu, Position::Extra, Some(5));
        assert_eq!(
            p,
            Err(ScheduleError::InvalidCycleConfig {
                crew_id: 5,
                cycle_length_weeks: 0
            })
        );
    }

    #[test]
    fn test_reset_skips_eligibility_gates() {
        let r = roster();
        // Cai's rotation starts 2024-01-13; a reset for an earlier week still applies
        let week = week_anchor(date(2024, 1, 6));
        let slot = SlotKey {
            boat: Boat::CatPpalu,
            position: Position::Captain,
        };
        let proposed = propose_reset(&r, week, &WeekSchedule::new(), slot, 3).unwrap();
        assert_eq!(proposed.week, week);
        assert_eq!(proposed.slot, slot);
        assert_eq!(proposed.crew.id, 3);
        assert!(!proposed.scheduled_last_week);

        // Ben is not trained for captain, but holds the slot
        assert!(propose_reset(&r, week, &WeekSchedule::new(), slot, 2).is_ok());
    }

    #[test]
    fn test_reset_of_unknown_holder_rejected() {
        let r = roster();
        let week = week_anchor(date(2024, 1, 6));
        let slot = SlotKey {
            boat: Boat::CatPpalu,
            position: Position::Chef,
        };
        assert_eq!(
            propose_reset(&r, week, &WeekSchedule::new(), slot, 99),
            Err(ScheduleError::UnknownCrew(99))
        );
    }
}
