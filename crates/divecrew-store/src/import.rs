//! Roster import from the crew service's JSON export.
//!
//! Records use the service's camelCase field names with one boolean per
//! position and per boat, and dates that may carry a time component
//! (`2024-01-06T00:00:00.000Z`). Only the calendar date is kept.

use std::io::Read;

use chrono::NaiveDate;
use divecrew_logic::constants::{Boat, PositionSkill};
use divecrew_logic::crew::{ContactMethod, CrewId, CrewMember, Training};
use divecrew_logic::ScheduleError;
use serde::Deserialize;

use crate::error::StoreError;

/// One crew record as exported by the crew service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewRecord {
    #[serde(rename = "_id")]
    pub id: CrewId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub contact_method: Option<ContactMethod>,
    #[serde(default)]
    pub date_employment_started: Option<String>,
    #[serde(default)]
    pub current_cycle_start: Option<String>,
    /// Signed so a bad export surfaces as `InvalidCycleConfig`, not a parse error.
    pub cycle_length_weeks: i64,
    #[serde(default)]
    pub positions_trained_captain: bool,
    #[serde(default, rename = "positionsTrained1stMate")]
    pub positions_trained_first_mate: bool,
    #[serde(default)]
    pub positions_trained_engineer: bool,
    #[serde(default)]
    pub positions_trained_chef: bool,
    #[serde(default)]
    pub positions_trained_deckhand: bool,
    #[serde(default)]
    pub boats_trained_cat_ppalu: bool,
    #[serde(default)]
    pub boats_trained_morning_star: bool,
    #[serde(default)]
    pub boats_trained_sea_explorer: bool,
}

impl CrewRecord {
    fn training(&self) -> Training {
        let positions = [
            (self.positions_trained_captain, PositionSkill::Captain),
            (self.positions_trained_first_mate, PositionSkill::FirstMate),
            (self.positions_trained_engineer, PositionSkill::Engineer),
            (self.positions_trained_chef, PositionSkill::Chef),
            (self.positions_trained_deckhand, PositionSkill::Deckhand),
        ];
        let boats = [
            (self.boats_trained_cat_ppalu, Boat::CatPpalu),
            (self.boats_trained_morning_star, Boat::MorningStar),
            (self.boats_trained_sea_explorer, Boat::SeaExplorer),
        ];
        Training {
            positions: positions.into_iter().filter(|(on, _)| *on).map(|(_, s)| s).collect(),
            boats: boats.into_iter().filter(|(on, _)| *on).map(|(_, b)| b).collect(),
        }
    }

    /// Convert to a validated crew member.
    pub fn into_crew(self) -> Result<CrewMember, StoreError> {
        let cycle_length_weeks = match u32::try_from(self.cycle_length_weeks) {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ScheduleError::InvalidCycleConfig {
                    crew_id: self.id,
                    cycle_length_weeks: self.cycle_length_weeks,
                }
                .into())
            }
        };
        let training = self.training();
        let crew = CrewMember {
            id: self.id,
            preferred_name: self.preferred_name.filter(|n| !n.trim().is_empty()),
            email: self.email.unwrap_or_default(),
            telephone: self.telephone.unwrap_or_default(),
            contact_method: self.contact_method.unwrap_or_default(),
            date_employment_started: parse_record_date(self.date_employment_started.as_deref())?,
            cycle_start: parse_record_date(self.current_cycle_start.as_deref())?,
            cycle_length_weeks,
            training,
            active: true,
            first_name: self.first_name,
            last_name: self.last_name,
        };
        crew.validate()?;
        Ok(crew)
    }
}

/// Calendar date from `YYYY-MM-DD` with an optional time suffix.
/// Blank or missing values are `None`.
pub fn parse_record_date(raw: Option<&str>) -> Result<Option<NaiveDate>, StoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| StoreError::InvalidRecord(format!("bad date {:?}: {}", raw, e)))
}

/// Parse a JSON array of crew records.
pub fn import_roster_str(json: &str) -> Result<Vec<CrewMember>, StoreError> {
    let records: Vec<CrewRecord> = serde_json::from_str(json)?;
    records.into_iter().map(CrewRecord::into_crew).collect()
}

pub fn import_roster<R: Read>(reader: R) -> Result<Vec<CrewMember>, StoreError> {
    let records: Vec<CrewRecord> = serde_json::from_reader(reader)?;
    records.into_iter().map(CrewRecord::into_crew).collect()
}
