//! Error types for the effectif engine

use thiserror::Error;

/// Failures raised by an [`EffectifStore`](crate::core::store::EffectifStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness violation on (unit, school year) reached the application layer.
    #[error("Uniqueness conflict on {unit}/{year}: {reason}")]
    Conflict {
        /// Unit of the conflicting record
        unit: String,
        /// School year of the conflicting record
        year: String,
        /// Backend message
        reason: String,
    },

    /// The storage backend cannot be reached right now; the request may be retried.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded back into a record.
    #[error("Corrupt stored record: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
                Self::Unavailable(err.to_string())
            }
            Some(ErrorCode::ConstraintViolation) => Self::Conflict {
                unit: String::new(),
                year: String::new(),
                reason: err.to_string(),
            },
            _ => match err {
                rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::InvalidColumnType(..) => Self::Corrupt(err.to_string()),
                other => Self::Unavailable(other.to_string()),
            },
        }
    }
}

/// Errors surfaced by the effectif service and its value types.
#[derive(Error, Debug)]
pub enum EffectifError {
    /// School year string does not match `YYYY-YYYY` with consecutive years.
    #[error("Invalid school year '{input}': {reason}")]
    InvalidSchoolYear {
        /// Rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Administrative unit reference is empty or malformed.
    #[error("Invalid administrative unit reference: {0}")]
    InvalidUnit(String),

    /// The previous school year would fall below the four-digit floor.
    #[error("School year {0} has no previous year")]
    YearBelowFloor(String),

    /// No effectifs are recorded for the requested unit and year.
    #[error("No effectifs recorded for unit '{unit}' in {year}")]
    MissingRecord {
        /// Requested unit
        unit: String,
        /// Requested school year
        year: String,
    },

    /// A submitted tree document could not be parsed.
    #[error("Invalid effectif document: {0}")]
    InvalidTreeDocument(String),

    /// Storage failure after local recovery was attempted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EffectifError {
    /// Whether the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Unavailable(_)))
    }
}
