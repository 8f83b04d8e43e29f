//! Rotation cycle model.
//!
//! Turns a crew member's cycle start and cycle length into the
//! week-in-cycle for a target week. Week 1 is the first week of the
//! rotation; anything past `cycle_length_weeks` is an overage.
//!
//! ```
//! use chrono::NaiveDate;
//! use divecrew_logic::calendar::week_anchor;
//! use divecrew_logic::crew::CrewMember;
//! use divecrew_logic::cycle::compute_cycle_week;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
//! let crew = CrewMember::new(1, "Ana", "Reyes", Some(start), 4);
//! let target = week_anchor(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
//! let cw = compute_cycle_week(&crew, target).unwrap();
//! assert_eq!(cw.week_in_cycle, 5);
//! assert!(cw.is_overage);
//! ```

use serde::{Deserialize, Serialize};

use crate::calendar::{is_anchor_day, week_anchor, weeks_between, WeekAnchor};
use crate::crew::CrewMember;

/// Position of a target week within a crew member's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleWeek {
    /// 1-based. Zero or negative when the target precedes the rotation start.
    pub week_in_cycle: i64,
    pub is_overage: bool,
}

/// First week a crew member's rotation counts from.
///
/// A start on the anchor weekday counts from that week. A mid-week start
/// counts from the next anchor weekday, so the partial week is not a
/// rotation week. `None` when no cycle start is set, or when the next
/// anchor day is past the end of the calendar.
pub fn effective_cycle_start(crew: &CrewMember) -> Option<WeekAnchor> {
    let start = crew.cycle_start?;
    let anchor = week_anchor(start);
    if is_anchor_day(start) {
        Some(anchor)
    } else {
        anchor.checked_add_weeks(1)
    }
}

/// Week-in-cycle and overage flag for `target`.
///
/// `None` when the crew member has no cycle start.
pub fn compute_cycle_week(crew: &CrewMember, target: WeekAnchor) -> Option<CycleWeek> {
    let start = effective_cycle_start(crew)?;
    let week_in_cycle = weeks_between(start, target) + 1;
    Some(CycleWeek {
        week_in_cycle,
        is_overage: week_in_cycle > i64::from(crew.cycle_length_weeks),
    })
}

/// Whether the crew member's rotation has begun by `target`.
///
/// Crew without a cycle start are never eligible.
pub fn has_started_by(crew: &CrewMember, target: WeekAnchor) -> bool {
    match effective_cycle_start(crew) {
        Some(start) => target >= start,
        None => false,
    }
}

/// "N/M" cycle count shown beside an assignment.
pub fn format_cycle_count(week_in_cycle: u32, cycle_length_weeks: u32) -> String {
    format!("{}/{}", week_in_cycle, cycle_length_weeks)
}
