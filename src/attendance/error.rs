use derive_more::{Display, Error};

/// Persistence failures, normalized across store backends.
#[derive(Debug, Display, Error, PartialEq)]
pub enum StoreError {
    /// Uniqueness violation on (employee_id, date): a concurrent create
    /// already won.
    #[display(fmt = "duplicate attendance record")]
    Conflict,

    #[display(fmt = "database error: {}", _0)]
    Database(#[error(not(source))] String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        // MySQL reports unique-key violations as SQLSTATE 23000
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Conflict;
            }
        }
        StoreError::Database(e.to_string())
    }
}

/// Outcomes of the punch and query operations. The first three are
/// business-rule violations the caller sees as 400s; the rest are server
/// failures.
#[derive(Debug, Display, Error)]
pub enum AttendanceError {
    #[display(fmt = "Already punched in")]
    AlreadyPunchedIn,

    #[display(fmt = "Already punched out")]
    AlreadyPunchedOut,

    #[display(fmt = "No punch in record for today")]
    NoPunchInRecord,

    /// Record points at an employee the store no longer knows.
    #[display(fmt = "employee {} not found", _0)]
    MissingEmployee(#[error(not(source))] u64),

    #[display(fmt = "{}", _0)]
    Store(StoreError),
}

impl AttendanceError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AttendanceError::AlreadyPunchedIn
                | AttendanceError::AlreadyPunchedOut
                | AttendanceError::NoPunchInRecord
        )
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        AttendanceError::Store(e)
    }
}

/// Malformed process configuration; aborts startup rather than individual
/// requests, since configuration is read once.
#[derive(Debug, Display, Error, PartialEq)]
pub enum ConfigError {
    #[display(fmt = "invalid clock time {:?}, expected HH:MM", value)]
    InvalidClockTime { value: String },
}
