use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::attendance::classifier::{self, PunctualityRules};
use crate::attendance::error::{AttendanceError, StoreError};
use crate::clock;
use crate::model::attendance::{
    AttendanceAnalytics, AttendanceRecord, EnrichedAttendance, Punctuality,
};
use crate::store::{AttendanceStore, Page, RecordFilter};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Listing parameters as they arrive from the caller, before defaults and
/// clamping are applied.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub punctuality: Option<Punctuality>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Punch transition engine and query front. Generic over the store; the
/// current instant is always an argument so callers own the clock.
pub struct AttendanceService<S> {
    store: S,
    rules: PunctualityRules,
    max_page_size: u32,
}

impl<S: AttendanceStore> AttendanceService<S> {
    pub fn new(store: S, rules: PunctualityRules, max_page_size: u32) -> Self {
        Self {
            store,
            rules,
            max_page_size,
        }
    }

    /// Records the day's punch-in for an employee. At most one per
    /// (employee, date); a create race lost to a concurrent punch-in
    /// reports `AlreadyPunchedIn`, never a second record.
    pub async fn punch_in(
        &self,
        employee_id: u64,
        now: NaiveDateTime,
    ) -> Result<EnrichedAttendance, AttendanceError> {
        let date = clock::date_key(&now);
        let punctuality = classifier::classify(Some(&now), &self.rules);

        let record = match self.store.find(employee_id, date).await? {
            Some(existing) if existing.punch_in.is_some() => {
                return Err(AttendanceError::AlreadyPunchedIn);
            }
            Some(_) => {
                // Imported row without a punch-in: fill it, guarded against
                // a concurrent punch-in on the same row.
                match self
                    .store
                    .set_punch_in(employee_id, date, now, punctuality)
                    .await?
                {
                    Some(record) => record,
                    None => return Err(AttendanceError::AlreadyPunchedIn),
                }
            }
            None => {
                match self
                    .store
                    .insert_punch_in(employee_id, date, now, punctuality)
                    .await
                {
                    Ok(record) => record,
                    // Lost the create race. Retry once against the row that
                    // won: usually it already holds a punch-in, unless it
                    // came from a concurrent import.
                    Err(StoreError::Conflict) => {
                        match self.store.find(employee_id, date).await? {
                            Some(existing) if existing.punch_in.is_none() => self
                                .store
                                .set_punch_in(employee_id, date, now, punctuality)
                                .await?
                                .ok_or(AttendanceError::AlreadyPunchedIn)?,
                            _ => return Err(AttendanceError::AlreadyPunchedIn),
                        }
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        info!(
            employee_id,
            %date,
            punctuality = %record.punctuality,
            "Punch-in recorded"
        );
        self.enrich(record).await
    }

    /// Records the day's punch-out. Requires a prior punch-in; worked hours
    /// are computed exactly once, here. The signed duration is kept as
    /// computed, including zero or negative values from skewed clocks.
    pub async fn punch_out(
        &self,
        employee_id: u64,
        now: NaiveDateTime,
    ) -> Result<EnrichedAttendance, AttendanceError> {
        let date = clock::date_key(&now);

        let record = self.store.find(employee_id, date).await?;
        let Some(punch_in) = record.as_ref().and_then(|r| r.punch_in) else {
            return Err(AttendanceError::NoPunchInRecord);
        };
        if record.is_some_and(|r| r.punch_out.is_some()) {
            return Err(AttendanceError::AlreadyPunchedOut);
        }

        let hours = round2((now - punch_in).num_milliseconds() as f64 / 3_600_000.0);

        let record = match self
            .store
            .apply_punch_out(employee_id, date, now, hours)
            .await?
        {
            Some(record) => record,
            // A concurrent punch-out got there first.
            None => return Err(AttendanceError::AlreadyPunchedOut),
        };

        info!(employee_id, %date, total_worked_hours = hours, "Punch-out recorded");
        self.enrich(record).await
    }

    /// Filtered, paginated listing; date descending, then creation order.
    pub async fn list(
        &self,
        request: ListRequest,
    ) -> Result<Vec<EnrichedAttendance>, AttendanceError> {
        let page = request.page.unwrap_or(1).max(1);
        let limit = request
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, self.max_page_size);

        let filter = RecordFilter {
            date: request.date,
            date_from: request.date_from,
            date_to: request.date_to,
            punctuality: request.punctuality,
            search: request.search,
        };
        // offset arithmetic in u64: page comes straight off the query
        // string, and u32 math would overflow on absurd page numbers
        let page = Page {
            offset: (u64::from(page) - 1) * u64::from(limit),
            limit,
        };

        Ok(self.store.query(&filter, page).await?)
    }

    /// Daily rollup for `reference_date`. Every record for the day counts
    /// as present regardless of category; the rate is 0 when no employees
    /// exist.
    pub async fn analytics(
        &self,
        reference_date: NaiveDate,
    ) -> Result<AttendanceAnalytics, AttendanceError> {
        let total_employees = self.store.count_employees().await?;
        let groups = self.store.punctuality_counts(reference_date).await?;

        let mut present_today = 0;
        let mut on_time_count = 0;
        let mut late_count = 0;
        for (punctuality, count) in groups {
            present_today += count;
            match punctuality {
                Punctuality::OnTime => on_time_count = count,
                Punctuality::Late => late_count = count,
                _ => {}
            }
        }

        let attendance_rate = if total_employees == 0 {
            0.0
        } else {
            round2(present_today as f64 / total_employees as f64 * 100.0)
        };

        Ok(AttendanceAnalytics {
            total_employees,
            present_today,
            on_time_count,
            late_count,
            attendance_rate,
        })
    }

    async fn enrich(
        &self,
        record: AttendanceRecord,
    ) -> Result<EnrichedAttendance, AttendanceError> {
        let employee = self
            .store
            .employee_brief(record.employee_id)
            .await?
            .ok_or(AttendanceError::MissingEmployee(record.employee_id))?;
        Ok(EnrichedAttendance::new(record, employee))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
