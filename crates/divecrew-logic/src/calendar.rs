//! Calendar and week arithmetic.
//!
//! Every schedule lookup and every cycle computation is keyed by a
//! [`WeekAnchor`]: a calendar date that falls on [`ANCHOR_WEEKDAY`]
//! (Saturday). Dates are timezone-free; instants are converted through
//! UTC before anchoring so the anchor day never drifts with the local
//! timezone.
//!
//! ```
//! use chrono::NaiveDate;
//! use divecrew_logic::calendar::{week_anchor, weeks_between};
//!
//! let wed = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let sat = week_anchor(wed);
//! assert_eq!(sat.to_string(), "2024-01-06");
//! assert_eq!(weeks_between(sat, sat.add_weeks(3)), 3);
//! ```

use std::fmt;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ANCHOR_WEEKDAY;

/// A date guaranteed to fall on the anchor weekday.
///
/// Deserializing normalizes: any `YYYY-MM-DD` is snapped back to its
/// week anchor, so stored keys can never be off-anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "NaiveDate", into = "NaiveDate")]
pub struct WeekAnchor(NaiveDate);

impl WeekAnchor {
    /// Most recent anchor weekday at or before `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self(date - Duration::days(days_since_anchor(date)))
    }

    /// Anchor the UTC calendar day of an instant.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self::new(instant.date_naive())
    }

    /// Week anchor of the current UTC day.
    pub fn current() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// # Panics
    ///
    /// If the result falls outside chrono's date range. Use
    /// [`WeekAnchor::checked_add_weeks`] for untrusted offsets.
    pub fn add_weeks(self, n: i64) -> Self {
        Self(self.0 + Duration::weeks(n))
    }

    /// # Panics
    ///
    /// If the result falls outside chrono's date range.
    pub fn sub_weeks(self, n: i64) -> Self {
        Self(self.0 - Duration::weeks(n))
    }

    /// `None` when the result falls outside chrono's date range.
    pub fn checked_add_weeks(self, n: i64) -> Option<Self> {
        let days = Days::new(n.checked_mul(7)?.unsigned_abs());
        let date = if n >= 0 {
            self.0.checked_add_days(days)
        } else {
            self.0.checked_sub_days(days)
        }?;
        Some(Self(date))
    }

    pub fn checked_sub_weeks(self, n: i64) -> Option<Self> {
        self.checked_add_weeks(n.checked_neg()?)
    }

    /// The week immediately before this one.
    pub fn previous(self) -> Self {
        self.sub_weeks(1)
    }

    pub fn next(self) -> Self {
        self.add_weeks(1)
    }
}

impl From<NaiveDate> for WeekAnchor {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

impl From<WeekAnchor> for NaiveDate {
    fn from(anchor: WeekAnchor) -> Self {
        anchor.0
    }
}

impl fmt::Display for WeekAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Days from the most recent anchor weekday to `date` (0..=6).
fn days_since_anchor(date: NaiveDate) -> i64 {
    let day = date.weekday().num_days_from_sunday() as i64;
    let anchor = ANCHOR_WEEKDAY.num_days_from_sunday() as i64;
    (day - anchor).rem_euclid(7)
}

/// Whether `date` already falls on the anchor weekday.
pub fn is_anchor_day(date: NaiveDate) -> bool {
    date.weekday() == ANCHOR_WEEKDAY
}

/// Normalize any date to its week anchor.
pub fn week_anchor(date: NaiveDate) -> WeekAnchor {
    WeekAnchor::new(date)
}

/// Panics on date overflow, as [`WeekAnchor::add_weeks`] does.
pub fn add_weeks(week: WeekAnchor, n: i64) -> WeekAnchor {
    week.add_weeks(n)
}

/// Panics on date overflow, as [`WeekAnchor::sub_weeks`] does.
pub fn sub_weeks(week: WeekAnchor, n: i64) -> WeekAnchor {
    week.sub_weeks(n)
}

/// Signed number of whole weeks from `from` to `to`.
///
/// Both arguments are anchored, so the day difference is always an
/// exact multiple of seven.
pub fn weeks_between(from: WeekAnchor, to: WeekAnchor) -> i64 {
    (to.0 - from.0).num_days() / 7
}

/// Every week anchor from `week_anchor(start)` through `week_anchor(end)`
/// inclusive. Empty when `end` precedes `start`.
pub fn weeks_in_range(start: NaiveDate, end: NaiveDate) -> Vec<WeekAnchor> {
    let first = week_anchor(start);
    let last = week_anchor(end);
    let count = weeks_between(first, last);
    if count < 0 {
        return Vec::new();
    }
    (0..=count).map(|n| first.add_weeks(n)).collect()
}
