#[cfg(test)]
pub mod memory;
pub mod mysql;

use chrono::{NaiveDate, NaiveDateTime};

use crate::attendance::error::StoreError;
use crate::model::attendance::{AttendanceRecord, EnrichedAttendance, Punctuality};
use crate::model::user::UserBrief;

/// Record filter for listing. `date` wins over the range when both are
/// given; the range is inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub punctuality: Option<Punctuality>,
    /// Case-insensitive substring match on the employee name, applied after
    /// the employee join.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: u64,
    pub limit: u32,
}

/// Persistence seam for the punch engine. Writes that guard an invariant
/// (first punch-in, single punch-out) are atomic conditional operations so
/// the engine never needs read-then-write for correctness; the unique key
/// on (employee_id, date) is the source of truth for record uniqueness.
#[allow(async_fn_in_trait)]
pub trait AttendanceStore {
    async fn find(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Creates the day's record with the punch-in already applied.
    /// `StoreError::Conflict` when a record for the key exists.
    async fn insert_punch_in(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_in: NaiveDateTime,
        punctuality: Punctuality,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Applies a punch-in to an existing record, only if it has none yet.
    /// `None` when the guard failed.
    async fn set_punch_in(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_in: NaiveDateTime,
        punctuality: Punctuality,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Applies a punch-out, only if the record has none yet. `None` when
    /// the guard failed (a concurrent punch-out won).
    async fn apply_punch_out(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_out: NaiveDateTime,
        total_worked_hours: f64,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Filtered listing joined with employee identity, sorted by date
    /// descending then creation order descending.
    async fn query(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<Vec<EnrichedAttendance>, StoreError>;

    /// Record counts for one date, grouped by punctuality.
    async fn punctuality_counts(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<(Punctuality, i64)>, StoreError>;

    async fn count_employees(&self) -> Result<i64, StoreError>;

    async fn employee_brief(&self, employee_id: u64) -> Result<Option<UserBrief>, StoreError>;
}
