use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use crate::attendance::error::StoreError;
use crate::model::attendance::{AttendanceRecord, EnrichedAttendance, Punctuality};
use crate::model::user::UserBrief;
use crate::store::{AttendanceStore, Page, RecordFilter};

/// In-memory store with the same conditional-write semantics as the MySQL
/// backend. A single mutex spans check and write, so the uniqueness and
/// single-punch guards hold under concurrent callers.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    records: Vec<AttendanceRecord>,
    employees: Vec<UserBrief>,
}

impl Inner {
    fn position(&self, employee_id: u64, date: NaiveDate) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.employee_id == employee_id && r.date == date)
    }
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employee(&self, name: &str, email: &str) -> UserBrief {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let employee = UserBrief {
            id: inner.next_id,
            name: name.to_string(),
            email: email.to_string(),
        };
        inner.employees.push(employee.clone());
        employee
    }

    /// Seeds a record that has no punch-in yet, the shape an external
    /// import produces. Stays `Punctuality::Unknown` until punched in.
    pub fn add_imported_record(
        &self,
        employee_id: u64,
        date: NaiveDate,
        created_at: NaiveDateTime,
    ) -> AttendanceRecord {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let record = AttendanceRecord {
            id: inner.next_id,
            employee_id,
            date,
            punch_in: None,
            punch_out: None,
            total_worked_hours: 0.0,
            punctuality: Punctuality::Unknown,
            created_at,
        };
        inner.records.push(record.clone());
        record
    }
}

impl AttendanceStore for MemoryAttendanceStore {
    async fn find(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .position(employee_id, date)
            .map(|i| inner.records[i].clone()))
    }

    async fn insert_punch_in(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_in: NaiveDateTime,
        punctuality: Punctuality,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.position(employee_id, date).is_some() {
            return Err(StoreError::Conflict);
        }
        inner.next_id += 1;
        let record = AttendanceRecord {
            id: inner.next_id,
            employee_id,
            date,
            punch_in: Some(punch_in),
            punch_out: None,
            total_worked_hours: 0.0,
            punctuality,
            created_at: punch_in,
        };
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn set_punch_in(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_in: NaiveDateTime,
        punctuality: Punctuality,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(i) = inner.position(employee_id, date) else {
            return Ok(None);
        };
        let record = &mut inner.records[i];
        if record.punch_in.is_some() {
            return Ok(None);
        }
        record.punch_in = Some(punch_in);
        record.punctuality = punctuality;
        Ok(Some(record.clone()))
    }

    async fn apply_punch_out(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_out: NaiveDateTime,
        total_worked_hours: f64,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(i) = inner.position(employee_id, date) else {
            return Ok(None);
        };
        let record = &mut inner.records[i];
        if record.punch_out.is_some() {
            return Ok(None);
        }
        record.punch_out = Some(punch_out);
        record.total_worked_hours = total_worked_hours;
        Ok(Some(record.clone()))
    }

    async fn query(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<Vec<EnrichedAttendance>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matches: Vec<(&AttendanceRecord, &UserBrief)> = inner
            .records
            .iter()
            .filter(|r| {
                if let Some(date) = filter.date {
                    r.date == date
                } else {
                    filter.date_from.is_none_or(|from| r.date >= from)
                        && filter.date_to.is_none_or(|to| r.date <= to)
                }
            })
            .filter(|r| filter.punctuality.is_none_or(|p| r.punctuality == p))
            .filter_map(|r| {
                let employee = inner.employees.iter().find(|e| e.id == r.employee_id)?;
                if let Some(needle) = &search {
                    if !employee.name.to_lowercase().contains(needle.as_str()) {
                        return None;
                    }
                }
                Some((r, employee))
            })
            .collect();

        // same sort key as the MySQL backend: date, then creation time,
        // then id
        matches.sort_by(|(a, _), (b, _)| {
            b.date
                .cmp(&a.date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });

        Ok(matches
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|(record, employee)| EnrichedAttendance::new(record.clone(), employee.clone()))
            .collect())
    }

    async fn punctuality_counts(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<(Punctuality, i64)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut counts: Vec<(Punctuality, i64)> = Vec::new();
        for record in inner.records.iter().filter(|r| r.date == date) {
            match counts.iter_mut().find(|(p, _)| *p == record.punctuality) {
                Some((_, n)) => *n += 1,
                None => counts.push((record.punctuality, 1)),
            }
        }
        Ok(counts)
    }

    async fn count_employees(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().unwrap().employees.len() as i64)
    }

    async fn employee_brief(&self, employee_id: u64) -> Result<Option<UserBrief>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.employees.iter().find(|e| e.id == employee_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    #[actix_web::test]
    async fn duplicate_insert_is_a_conflict() {
        let store = MemoryAttendanceStore::new();
        let alice = store.add_employee("Alice", "alice@example.com");

        store
            .insert_punch_in(alice.id, day(2), at(2, 9, 0), Punctuality::OnTime)
            .await
            .unwrap();
        let err = store
            .insert_punch_in(alice.id, day(2), at(2, 9, 1), Punctuality::OnTime)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict);
    }

    #[actix_web::test]
    async fn punch_out_guard_fires_only_once() {
        let store = MemoryAttendanceStore::new();
        let alice = store.add_employee("Alice", "alice@example.com");
        store
            .insert_punch_in(alice.id, day(2), at(2, 9, 0), Punctuality::OnTime)
            .await
            .unwrap();

        let first = store
            .apply_punch_out(alice.id, day(2), at(2, 17, 0), 8.0)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = store
            .apply_punch_out(alice.id, day(2), at(2, 18, 0), 9.0)
            .await
            .unwrap();
        assert!(second.is_none());

        let record = store.find(alice.id, day(2)).await.unwrap().unwrap();
        assert_eq!(record.punch_out, Some(at(2, 17, 0)));
        assert_eq!(record.total_worked_hours, 8.0);
    }

    #[actix_web::test]
    async fn same_day_rows_sort_by_created_at_before_id() {
        let store = MemoryAttendanceStore::new();
        let alice = store.add_employee("Alice", "alice@example.com");
        let bob = store.add_employee("Bob", "bob@example.com");

        // bob's row carries the higher id but the earlier creation time
        store.add_imported_record(alice.id, day(2), at(2, 8, 0));
        store.add_imported_record(bob.id, day(2), at(2, 7, 0));

        let rows = store
            .query(&RecordFilter::default(), Page { offset: 0, limit: 10 })
            .await
            .unwrap();
        assert_eq!(rows[0].employee.id, alice.id);
        assert_eq!(rows[1].employee.id, bob.id);
    }

    #[actix_web::test]
    async fn set_punch_in_only_fills_empty_records() {
        let store = MemoryAttendanceStore::new();
        let alice = store.add_employee("Alice", "alice@example.com");
        store.add_imported_record(alice.id, day(2), at(2, 0, 0));

        let updated = store
            .set_punch_in(alice.id, day(2), at(2, 9, 20), Punctuality::Late)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.punctuality, Punctuality::Late);

        let again = store
            .set_punch_in(alice.id, day(2), at(2, 9, 30), Punctuality::Late)
            .await
            .unwrap();
        assert!(again.is_none());
    }
}
