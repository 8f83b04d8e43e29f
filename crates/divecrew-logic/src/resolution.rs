//! Overage disposition.
//!
//! Decides what happens when a proposed assignment lands past the end of
//! the crew member's rotation:
//!
//! | condition | resolution |
//! |-----------|------------|
//! | `week <= cycle_length` | [`Resolution::Normal`] |
//! | over, not on duty last week | [`Resolution::AutoReset`] |
//! | over, on duty last week | [`Resolution::PendingConfirmation`] |
//!
//! A gap right after the rotation boundary is a normal turnover, so the
//! cycle restarts silently. Someone still on the schedule the week before
//! is genuinely overdue and needs a human decision.
//!
//! The decision here is pure. Applying it (writing the new cycle start to
//! the crew directory, asking the human) belongs to the caller.

use serde::{Deserialize, Serialize};

use crate::calendar::WeekAnchor;
use crate::constants::{Boat, Position};
use crate::crew::CrewId;
use crate::rules::ProposedAssignment;
use crate::schedule::{Assignment, SlotKey};

/// Disposition of a proposed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Within the rotation; record as computed.
    Normal,
    /// Restart the cycle at the target week and record week 1.
    AutoReset,
    /// Overdue while on duty last week; a human decides.
    PendingConfirmation,
}

/// Human answer to a [`ResetPrompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetDecision {
    /// Restart the cycle at the target week.
    Reset,
    /// Record the overdue week as computed, flagged.
    KeepAsIs,
}

/// Disposition for a week-in-cycle against the cycle length.
pub fn resolve_overage(
    week_in_cycle: i64,
    cycle_length_weeks: u32,
    scheduled_last_week: bool,
) -> Resolution {
    if week_in_cycle <= i64::from(cycle_length_weeks) {
        Resolution::Normal
    } else if !scheduled_last_week {
        Resolution::AutoReset
    } else {
        Resolution::PendingConfirmation
    }
}

/// Disposition for an accepted proposal.
pub fn resolve(proposed: &ProposedAssignment) -> Resolution {
    resolve_overage(
        proposed.cycle.week_in_cycle,
        proposed.crew.cycle_length_weeks,
        proposed.scheduled_last_week,
    )
}

/// The assignment recorded once a cycle restarts at the target week.
pub fn reset_assignment(proposed: &ProposedAssignment) -> Assignment {
    Assignment::snapshot(&proposed.crew, 1)
}

/// Suspend point: everything a human needs to decide on an overdue crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPrompt {
    pub crew_id: CrewId,
    pub crew_name: String,
    pub week: WeekAnchor,
    pub boat: Boat,
    pub position: Position,
    pub current_week: u32,
    pub cycle_length: u32,
}

impl ResetPrompt {
    pub fn from_proposal(proposed: &ProposedAssignment) -> Self {
        Self {
            crew_id: proposed.crew.id,
            crew_name: proposed.crew.display_name(),
            week: proposed.week,
            boat: proposed.slot.boat,
            position: proposed.slot.position,
            current_week: proposed.week_in_cycle(),
            cycle_length: proposed.crew.cycle_length_weeks,
        }
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey {
            boat: self.boat,
            position: self.position,
        }
    }

    /// Text shown to the scheduler.
    pub fn message(&self) -> String {
        format!(
            "{} is over their cycle limit (week {} of {}). Reset their cycle to start on {}?",
            self.crew_name, self.current_week, self.cycle_length, self.week
        )
    }
}
