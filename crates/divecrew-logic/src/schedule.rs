//! Weekly schedule slots and assignment snapshots.
//!
//! A [`WeekSchedule`] maps boat → position → [`Assignment`] for one week.
//! Assignment fields are snapshots taken when the slot was filled; they
//! are not recomputed when the crew record later changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{Boat, Position};
use crate::crew::{CrewId, CrewMember};
use crate::cycle::format_cycle_count;

/// One filled slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub crew_id: CrewId,
    /// Display name at assignment time.
    pub name: String,
    /// Week-in-cycle at assignment time; 0 = not computed.
    pub week: u32,
    pub cycle_length: u32,
    /// "N/M" as shown on the schedule.
    pub cycle_count: String,
    /// Recorded past the end of the rotation without a reset.
    #[serde(default)]
    pub is_overage: bool,
}

impl Assignment {
    /// Snapshot `crew` at `week` of their rotation.
    pub fn snapshot(crew: &CrewMember, week: u32) -> Self {
        Self {
            crew_id: crew.id,
            name: crew.display_name(),
            week,
            cycle_length: crew.cycle_length_weeks,
            cycle_count: format_cycle_count(week, crew.cycle_length_weeks),
            is_overage: crew.cycle_length_weeks > 0 && week > crew.cycle_length_weeks,
        }
    }
}

/// Slot coordinates within a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub boat: Boat,
    pub position: Position,
}

/// All assignments for a single week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekSchedule {
    slots: BTreeMap<Boat, BTreeMap<Position, Assignment>>,
}

impl WeekSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, boat: Boat, position: Position) -> Option<&Assignment> {
        self.slots.get(&boat)?.get(&position)
    }

    /// Fill a slot, returning what it held before.
    pub fn set(
        &mut self,
        boat: Boat,
        position: Position,
        assignment: Assignment,
    ) -> Option<Assignment> {
        self.slots.entry(boat).or_default().insert(position, assignment)
    }

    /// Clear a slot. Boats left with no slots are dropped.
    pub fn remove(&mut self, boat: Boat, position: Position) -> Option<Assignment> {
        let positions = self.slots.get_mut(&boat)?;
        let removed = positions.remove(&position);
        if positions.is_empty() {
            self.slots.remove(&boat);
        }
        removed
    }

    /// Filled slots in boat, then position order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &Assignment)> {
        self.slots.iter().flat_map(|(boat, positions)| {
            positions.iter().map(move |(position, a)| {
                (
                    SlotKey {
                        boat: *boat,
                        position: *position,
                    },
                    a,
                )
            })
        })
    }

    /// Slot currently held by `crew_id`, if any.
    pub fn slot_of(&self, crew_id: CrewId) -> Option<SlotKey> {
        self.iter()
            .find(|(_, a)| a.crew_id == crew_id)
            .map(|(key, _)| key)
    }

    /// Whether `crew_id` holds any slot this week.
    pub fn contains_crew(&self, crew_id: CrewId) -> bool {
        self.slot_of(crew_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Crew ids that appear in more than one slot. Empty for a valid week.
    pub fn double_booked(&self) -> Vec<CrewId> {
        let mut counts: BTreeMap<CrewId, usize> = BTreeMap::new();
        for (_, a) in self.iter() {
            *counts.entry(a.crew_id).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect()
    }
}
