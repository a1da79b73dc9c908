use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;
use tracing::debug;

use crate::attendance::error::StoreError;
use crate::model::attendance::{AttendanceRecord, EnrichedAttendance, Punctuality};
use crate::model::user::UserBrief;
use crate::store::{AttendanceStore, Page, RecordFilter};

const RECORD_COLUMNS: &str =
    "id, employee_id, date, punch_in, punch_out, total_worked_hours, punctuality, created_at";

/// sqlx-backed store. Uniqueness of (employee_id, date) rests on the
/// `uq_attendance_employee_date` key (migrations/0001_init.sql); the
/// conditional writes are single UPDATE statements so races resolve inside
/// MySQL, not in application code.
#[derive(Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?"
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn fetch_expected(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<AttendanceRecord, StoreError> {
        self.fetch(employee_id, date).await?.ok_or_else(|| {
            StoreError::Database(format!(
                "attendance row for employee {employee_id} on {date} missing after write"
            ))
        })
    }
}

#[derive(sqlx::FromRow)]
struct EnrichedRow {
    id: u64,
    date: NaiveDate,
    punch_in: Option<NaiveDateTime>,
    punch_out: Option<NaiveDateTime>,
    total_worked_hours: f64,
    punctuality: Punctuality,
    employee_id: u64,
    employee_name: String,
    employee_email: String,
}

impl From<EnrichedRow> for EnrichedAttendance {
    fn from(row: EnrichedRow) -> Self {
        EnrichedAttendance {
            id: row.id,
            employee: UserBrief {
                id: row.employee_id,
                name: row.employee_name,
                email: row.employee_email,
            },
            date: row.date,
            punch_in: row.punch_in,
            punch_out: row.punch_out,
            total_worked_hours: row.total_worked_hours,
            punctuality: row.punctuality,
        }
    }
}

impl AttendanceStore for MySqlAttendanceStore {
    async fn find(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.fetch(employee_id, date).await
    }

    async fn insert_punch_in(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_in: NaiveDateTime,
        punctuality: Punctuality,
    ) -> Result<AttendanceRecord, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, punch_in, punctuality)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(punch_in)
        .bind(punctuality.to_string())
        .execute(&self.pool)
        .await?;

        self.fetch_expected(employee_id, date).await
    }

    async fn set_punch_in(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_in: NaiveDateTime,
        punctuality: Punctuality,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET punch_in = ?, punctuality = ?
            WHERE employee_id = ?
            AND date = ?
            AND punch_in IS NULL
            "#,
        )
        .bind(punch_in)
        .bind(punctuality.to_string())
        .bind(employee_id)
        .bind(date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_expected(employee_id, date).await.map(Some)
    }

    async fn apply_punch_out(
        &self,
        employee_id: u64,
        date: NaiveDate,
        punch_out: NaiveDateTime,
        total_worked_hours: f64,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET punch_out = ?, total_worked_hours = ?
            WHERE employee_id = ?
            AND date = ?
            AND punch_out IS NULL
            "#,
        )
        .bind(punch_out)
        .bind(total_worked_hours)
        .bind(employee_id)
        .bind(date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_expected(employee_id, date).await.map(Some)
    }

    async fn query(
        &self,
        filter: &RecordFilter,
        page: Page,
    ) -> Result<Vec<EnrichedAttendance>, StoreError> {
        // ---------- build WHERE clause dynamically ----------
        let mut conditions: Vec<&str> = Vec::new();
        let mut bindings: Vec<String> = Vec::new();

        if let Some(date) = filter.date {
            conditions.push("a.date = ?");
            bindings.push(date.to_string());
        } else {
            if let Some(from) = filter.date_from {
                conditions.push("a.date >= ?");
                bindings.push(from.to_string());
            }
            if let Some(to) = filter.date_to {
                conditions.push("a.date <= ?");
                bindings.push(to.to_string());
            }
        }

        if let Some(punctuality) = filter.punctuality {
            conditions.push("a.punctuality = ?");
            bindings.push(punctuality.to_string());
        }

        if let Some(search) = &filter.search {
            conditions.push("LOWER(u.name) LIKE ?");
            bindings.push(format!("%{}%", search.to_lowercase()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT a.id, a.date, a.punch_in, a.punch_out, a.total_worked_hours, \
             a.punctuality, a.employee_id, u.name AS employee_name, u.email AS employee_email \
             FROM attendance a \
             INNER JOIN users u ON u.id = a.employee_id \
             {where_clause} \
             ORDER BY a.date DESC, a.created_at DESC, a.id DESC \
             LIMIT ? OFFSET ?"
        );
        debug!(sql = %sql, bindings = ?bindings, "Fetching attendance records");

        let mut query = sqlx::query_as::<_, EnrichedRow>(&sql);
        for binding in &bindings {
            query = query.bind(binding);
        }
        query = query.bind(page.limit as i64).bind(page.offset as i64);

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(EnrichedAttendance::from).collect())
    }

    async fn punctuality_counts(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<(Punctuality, i64)>, StoreError> {
        let counts = sqlx::query_as::<_, (Punctuality, i64)>(
            r#"
            SELECT punctuality, COUNT(*)
            FROM attendance
            WHERE date = ?
            GROUP BY punctuality
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn count_employees(&self) -> Result<i64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn employee_brief(&self, employee_id: u64) -> Result<Option<UserBrief>, StoreError> {
        let brief =
            sqlx::query_as::<_, UserBrief>("SELECT id, name, email FROM users WHERE id = ?")
                .bind(employee_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(brief)
    }
}
