//! Fleet constants: boats, positions and the training each one needs.
//!
//! The fleet is fixed: three boats, each crewed by the same six positions.
//! Wire names (serde) match the identifiers the schedule store and the
//! roster import use.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekday every schedule week starts on.
pub const ANCHOR_WEEKDAY: Weekday = Weekday::Sat;

/// A boat in the fleet. The boat is also the capability a crew member
/// must be trained for to work aboard it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Boat {
    #[serde(rename = "catPpalu")]
    CatPpalu,
    #[serde(rename = "morningStar")]
    MorningStar,
    #[serde(rename = "seaExplorer")]
    SeaExplorer,
}

impl Boat {
    /// All boats in display order.
    pub const ALL: [Boat; 3] = [Boat::CatPpalu, Boat::MorningStar, Boat::SeaExplorer];

    /// Identifier used as the schedule mapping key.
    pub fn id(self) -> &'static str {
        match self {
            Boat::CatPpalu => "catPpalu",
            Boat::MorningStar => "morningStar",
            Boat::SeaExplorer => "seaExplorer",
        }
    }

    /// Human-readable boat name.
    pub fn label(self) -> &'static str {
        match self {
            Boat::CatPpalu => "Cat Ppalu",
            Boat::MorningStar => "Morning Star",
            Boat::SeaExplorer => "Sea Explorer",
        }
    }

    /// Positions crewed aboard this boat, in display order.
    pub fn positions(self) -> &'static [Position] {
        &Position::ALL
    }
}

/// A crew position aboard a boat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "CAPT")]
    Captain,
    #[serde(rename = "1st MATE")]
    FirstMate,
    #[serde(rename = "ENGINEER")]
    Engineer,
    #[serde(rename = "CHEF")]
    Chef,
    #[serde(rename = "DIVEMASTER")]
    Divemaster,
    /// Supernumerary slot; anyone may fill it.
    #[serde(rename = "EXTRA")]
    Extra,
}

impl Position {
    /// All positions in display order.
    pub const ALL: [Position; 6] = [
        Position::Captain,
        Position::FirstMate,
        Position::Engineer,
        Position::Chef,
        Position::Divemaster,
        Position::Extra,
    ];

    /// Label shown on schedules and print rows.
    pub fn label(self) -> &'static str {
        match self {
            Position::Captain => "CAPT",
            Position::FirstMate => "1st MATE",
            Position::Engineer => "ENGINEER",
            Position::Chef => "CHEF",
            Position::Divemaster => "DIVEMASTER",
            Position::Extra => "EXTRA",
        }
    }

    /// Training required to fill this position. `None` means no requirement.
    pub fn required_skill(self) -> Option<PositionSkill> {
        match self {
            Position::Captain => Some(PositionSkill::Captain),
            Position::FirstMate => Some(PositionSkill::FirstMate),
            Position::Engineer => Some(PositionSkill::Engineer),
            Position::Chef => Some(PositionSkill::Chef),
            Position::Divemaster => Some(PositionSkill::Deckhand),
            Position::Extra => None,
        }
    }
}

/// Position training a crew member can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PositionSkill {
    Captain,
    FirstMate,
    Engineer,
    Chef,
    Deckhand,
}

impl PositionSkill {
    pub const ALL: [PositionSkill; 5] = [
        PositionSkill::Captain,
        PositionSkill::FirstMate,
        PositionSkill::Engineer,
        PositionSkill::Chef,
        PositionSkill::Deckhand,
    ];
}
