//! Store and session errors.

use divecrew_logic::crew::CrewId;
use divecrew_logic::ScheduleError;
use thiserror::Error;

/// Failure reading or writing a collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("crew member {0} not found")]
    NotFound(CrewId),

    /// A write was refused because the record breaks a core rule.
    #[error(transparent)]
    Invalid(#[from] ScheduleError),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// The backing service could not be reached.
    #[error("{0} unavailable")]
    Unavailable(String),
}

/// Failure of a scheduling session operation.
///
/// Either the request broke a scheduling rule (the caller may retry with
/// different input) or a collaborator write failed (nothing was recorded).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(ScheduleError),

    #[error("persistence failure: {0}")]
    PersistenceFailure(StoreError),
}

impl From<ScheduleError> for SessionError {
    fn from(e: ScheduleError) -> Self {
        SessionError::Rejected(e)
    }
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Invalid(rule) => SessionError::Rejected(rule),
            other => SessionError::PersistenceFailure(other),
        }
    }
}
