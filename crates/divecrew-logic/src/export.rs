//! Flat schedule rows for printing a range of weeks.

use serde::{Deserialize, Serialize};

use crate::calendar::WeekAnchor;
use crate::schedule::WeekSchedule;

/// One printed line: who works where in which week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRow {
    pub week_start: WeekAnchor,
    pub boat: String,
    pub position: String,
    pub crew: String,
    /// "N/M", rebuilt from the stored week and cycle length.
    pub cycle: String,
}

/// Flatten weeks into rows: week order as given, then boat, then position.
pub fn print_rows<'a>(
    weeks: impl IntoIterator<Item = (WeekAnchor, &'a WeekSchedule)>,
) -> Vec<PrintRow> {
    weeks
        .into_iter()
        .flat_map(|(week, schedule)| {
            schedule.iter().map(move |(slot, a)| PrintRow {
                week_start: week,
                boat: slot.boat.label().to_string(),
                position: slot.position.label().to_string(),
                crew: a.name.clone(),
                cycle: format!("{}/{}", a.week, a.cycle_length),
            })
        })
        .collect()
}
