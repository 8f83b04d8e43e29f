//! Pure scheduling logic for DiveCrew.
//!
//! This crate holds the crew rotation and boat scheduling rules with no
//! database, no I/O and no UI. Functions take plain data and return
//! results, so every rule is unit-testable on its own and the
//! persistence layer (`divecrew-store`) only has to apply decisions.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`calendar`] | Week anchors (Saturday), week shifting, whole-week differences |
//! | [`constants`] | Boats, positions, position → training mapping |
//! | [`crew`] | Crew records, training flags, roster snapshot |
//! | [`cycle`] | Week-in-cycle, overage flag, rotation start |
//! | [`error`] | Rejection taxonomy |
//! | [`export`] | Flat rows for printing a range of weeks |
//! | [`resolution`] | Overage disposition (normal / auto reset / confirm) |
//! | [`rules`] | Eligibility predicate, candidate filter, assignment proposals |
//! | [`schedule`] | Week slot map and assignment snapshots |

pub mod calendar;
pub mod constants;
pub mod crew;
pub mod cycle;
pub mod error;
pub mod export;
pub mod resolution;
pub mod rules;
pub mod schedule;

pub use error::ScheduleError;
