//! DiveCrew Store - collaborators and the scheduling workflow
//!
//! The pure rules live in `divecrew-logic`. This crate connects them to
//! the crew directory and the schedule store and applies their side
//! effects.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `directory` | `CrewDirectory` trait, in-memory directory |
//! | `schedule_store` | `ScheduleStore` trait, in-memory store |
//! | `session` | `SchedulingSession`: assign, confirm, reset, save, print |
//! | `persistence` | Versioned bincode snapshot of directory and store |
//! | `import` | Roster import from the crew service JSON export |
//! | `config` | `SchedulerConfig` and its validation |
//! | `error` | `StoreError`, `SessionError` |

pub mod config;
pub mod directory;
pub mod error;
pub mod import;
pub mod persistence;
pub mod schedule_store;
pub mod session;

pub use directory::{CrewDirectory, MemoryDirectory};
pub use error::{SessionError, StoreError};
pub use schedule_store::{MemoryScheduleStore, ScheduleStore};
pub use session::{AssignOutcome, SchedulingSession};
