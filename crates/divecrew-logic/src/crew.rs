//! Crew records and the roster snapshot.
//!
//! A [`CrewMember`] carries rotation parameters (`cycle_start`,
//! `cycle_length_weeks`) and training flags. The scheduling core only
//! ever mutates `cycle_start`, and only when a cycle is reset.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{Boat, Position, PositionSkill};
use crate::error::ScheduleError;

pub type CrewId = u64;

/// How a crew member prefers to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
}

/// Position and boat training held by a crew member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub positions: BTreeSet<PositionSkill>,
    pub boats: BTreeSet<Boat>,
}

impl Training {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, skill: PositionSkill) -> Self {
        self.positions.insert(skill);
        self
    }

    pub fn with_boat(mut self, boat: Boat) -> Self {
        self.boats.insert(boat);
        self
    }

    /// Trained for every position and every boat.
    pub fn all() -> Self {
        Self {
            positions: PositionSkill::ALL.into_iter().collect(),
            boats: Boat::ALL.into_iter().collect(),
        }
    }

    /// Whether this training satisfies the position's requirement.
    /// Positions without a requirement are always satisfied.
    pub fn can_fill(&self, position: Position) -> bool {
        match position.required_skill() {
            Some(skill) => self.positions.contains(&skill),
            None => true,
        }
    }

    pub fn can_crew(&self, boat: Boat) -> bool {
        self.boats.contains(&boat)
    }
}

/// A crew member's master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: CrewId,
    pub first_name: String,
    pub last_name: String,
    /// Shown instead of "first last" when non-blank.
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub contact_method: ContactMethod,
    #[serde(default)]
    pub date_employment_started: Option<NaiveDate>,
    /// First day of the current rotation. `None` = never eligible.
    pub cycle_start: Option<NaiveDate>,
    /// Weeks in one rotation. Must be positive.
    pub cycle_length_weeks: u32,
    #[serde(default)]
    pub training: Training,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CrewMember {
    /// Create an active crew member with no training and no contact details.
    pub fn new(
        id: CrewId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        cycle_start: Option<NaiveDate>,
        cycle_length_weeks: u32,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            preferred_name: None,
            email: String::new(),
            telephone: String::new(),
            contact_method: ContactMethod::Email,
            date_employment_started: None,
            cycle_start,
            cycle_length_weeks,
            training: Training::default(),
            active: true,
        }
    }

    pub fn with_training(mut self, training: Training) -> Self {
        self.training = training;
        self
    }

    pub fn with_preferred_name(mut self, name: impl Into<String>) -> Self {
        self.preferred_name = Some(name.into());
        self
    }

    /// Preferred name if non-blank, otherwise "first last".
    pub fn display_name(&self) -> String {
        match self.preferred_name.as_deref().map(str::trim) {
            Some(preferred) if !preferred.is_empty() => preferred.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Date the current rotation ends: `cycle_start + cycle_length_weeks` weeks.
    pub fn cycle_end(&self) -> Option<NaiveDate> {
        let start = self.cycle_start?;
        start.checked_add_days(chrono::Days::new(7 * u64::from(self.cycle_length_weeks)))
    }

    /// Reject records the cycle model must never see.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.cycle_length_weeks == 0 {
            return Err(ScheduleError::InvalidCycleConfig {
                crew_id: self.id,
                cycle_length_weeks: i64::from(self.cycle_length_weeks),
            });
        }
        Ok(())
    }
}

/// Snapshot of the active crew, keyed by id.
///
/// Loaded once per scheduling session and rebuilt after every cycle reset.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: BTreeMap<CrewId, CrewMember>,
}

impl Roster {
    /// Build a roster, dropping deactivated crew.
    pub fn new(members: impl IntoIterator<Item = CrewMember>) -> Self {
        Self {
            members: members
                .into_iter()
                .filter(|c| c.active)
                .map(|c| (c.id, c))
                .collect(),
        }
    }

    pub fn get(&self, id: CrewId) -> Option<&CrewMember> {
        self.members.get(&id)
    }

    /// Replace one member's record in place. An inactive record drops out.
    pub fn upsert(&mut self, crew: CrewMember) {
        if crew.active {
            self.members.insert(crew.id, crew);
        } else {
            self.members.remove(&crew.id);
        }
    }

    /// Crew in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CrewMember> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
