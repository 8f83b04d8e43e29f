//! Rejections raised by the scheduling core.
//!
//! None of these are fatal: the caller may retry with different input.

use thiserror::Error;

use crate::calendar::WeekAnchor;
use crate::constants::{Boat, Position};
use crate::crew::CrewId;
use crate::rules::Ineligibility;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("crew member {0} is not on the roster")]
    UnknownCrew(CrewId),

    #[error("crew member {crew_id} has invalid cycle length {cycle_length_weeks} (must be positive)")]
    InvalidCycleConfig {
        crew_id: CrewId,
        cycle_length_weeks: i64,
    },

    #[error("crew member {crew_id} already holds {} {} in week {week}", .boat.label(), .position.label())]
    AlreadyAssigned {
        crew_id: CrewId,
        week: WeekAnchor,
        boat: Boat,
        position: Position,
    },

    #[error("crew member {crew_id} is not eligible: {reason}")]
    NotEligible {
        crew_id: CrewId,
        reason: Ineligibility,
    },

    #[error("no crew assigned to {} {} in week {week}", .boat.label(), .position.label())]
    SlotEmpty {
        week: WeekAnchor,
        boat: Boat,
        position: Position,
    },

    #[error("week {week} is before the current week {current} and can no longer be edited")]
    PastWeekLocked {
        week: WeekAnchor,
        current: WeekAnchor,
    },
}
