//! Schedule store: persisted weekly assignments.

use std::collections::BTreeMap;

use divecrew_logic::calendar::WeekAnchor;
use divecrew_logic::schedule::WeekSchedule;

use crate::error::StoreError;

/// Per-week read and replace of schedule slots.
pub trait ScheduleStore {
    /// Assignments for `week`; empty when nothing is stored.
    fn get_week(&self, week: WeekAnchor) -> Result<WeekSchedule, StoreError>;

    /// Atomically discard `week`'s prior content and install `schedule`.
    /// Stale slots are never visible alongside the new ones.
    fn replace_week(&mut self, week: WeekAnchor, schedule: &WeekSchedule) -> Result<(), StoreError>;

    /// Weeks that currently hold any assignment, in date order.
    fn stored_weeks(&self) -> Result<Vec<WeekAnchor>, StoreError>;
}

/// In-process store keyed by week anchor.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    weeks: BTreeMap<WeekAnchor, WeekSchedule>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weeks(weeks: impl IntoIterator<Item = (WeekAnchor, WeekSchedule)>) -> Self {
        Self {
            weeks: weeks.into_iter().filter(|(_, s)| !s.is_empty()).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekAnchor, &WeekSchedule)> {
        self.weeks.iter()
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn get_week(&self, week: WeekAnchor) -> Result<WeekSchedule, StoreError> {
        Ok(self.weeks.get(&week).cloned().unwrap_or_default())
    }

    fn replace_week(
        &mut self,
        week: WeekAnchor,
        schedule: &WeekSchedule,
    ) -> Result<(), StoreError> {
        if schedule.is_empty() {
            self.weeks.remove(&week);
        } else {
            self.weeks.insert(week, schedule.clone());
        }
        log::debug!("replaced week {} ({} slots)", week, schedule.len());
        Ok(())
    }

    fn stored_weeks(&self) -> Result<Vec<WeekAnchor>, StoreError> {
        Ok(self.weeks.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use divecrew_logic::calendar::week_anchor;
    use divecrew_logic::constants::{Boat, Position};
    use divecrew_logic::crew::CrewMember;
    use divecrew_logic::schedule::Assignment;

    fn week() -> WeekAnchor {
        week_anchor(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap())
    }

    fn filled(ids: &[u64]) -> WeekSchedule {
        let mut s = WeekSchedule::new();
        for (i, id) in ids.iter().enumerate() {
            let crew = CrewMember::new(*id, "Crew", id.to_string(), None, 4);
            s.set(Boat::ALL[i % 3], Position::ALL[i / 3], Assignment::snapshot(&crew, 1));
        }
        s
    }

    #[test]
    fn test_missing_week_is_empty() {
        let store = MemoryScheduleStore::new();
        assert!(store.get_week(week()).unwrap().is_empty());
    }

    #[test]
    fn test_replace_discards_stale_slots() {
        let mut store = MemoryScheduleStore::new();
        store.replace_week(week(), &filled(&[1, 2, 3, 4])).unwrap();
        store.replace_week(week(), &filled(&[9])).unwrap();
        let stored = store.get_week(week()).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored.contains_crew(9));
        assert!(!stored.contains_crew(2));
    }

    #[test]
    fn test_replace_with_empty_clears_week() {
        let mut store = MemoryScheduleStore::new();
        store.replace_week(week(), &filled(&[1])).unwrap();
        store.replace_week(week(), &WeekSchedule::new()).unwrap();
        assert!(store.stored_weeks().unwrap().is_empty());
    }

    #[test]
    fn test_weeks_are_independent() {
        let mut store = MemoryScheduleStore::new();
        store.replace_week(week(), &filled(&[1])).unwrap();
        store.replace_week(week().next(), &filled(&[2, 3])).unwrap();
        store.replace_week(week(), &filled(&[4])).unwrap();
        assert_eq!(store.get_week(week().next()).unwrap().len(), 2);
        assert_eq!(store.stored_weeks().unwrap(), vec![week(), week().next()]);
    }
}
