use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserBrief;

/// Classification of a punch-in against the configured business start and
/// grace window. `Unknown` is the state of a record that has no punch-in
/// yet (imported rows); a fresh punch-in always assigns one of the other
/// three.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Punctuality {
    Early,
    OnTime,
    Late,
    Unknown,
}

/// One attendance row per (employee, date); the unique key on that pair is
/// enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub punch_in: Option<NaiveDateTime>,
    pub punch_out: Option<NaiveDateTime>,
    pub total_worked_hours: f64,
    pub punctuality: Punctuality,
    pub created_at: NaiveDateTime,
}

/// Attendance record joined with the minimal employee projection, in the
/// external wire shape.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAttendance {
    #[schema(example = 1)]
    pub id: u64,
    pub employee: UserBrief,
    #[schema(example = "2024-03-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_out: Option<NaiveDateTime>,
    #[schema(example = 8.5)]
    pub total_worked_hours: f64,
    #[schema(example = "on-time")]
    pub punctuality: Punctuality,
}

impl EnrichedAttendance {
    pub fn new(record: AttendanceRecord, employee: UserBrief) -> Self {
        Self {
            id: record.id,
            employee,
            date: record.date,
            punch_in: record.punch_in,
            punch_out: record.punch_out,
            total_worked_hours: record.total_worked_hours,
            punctuality: record.punctuality,
        }
    }
}

/// Daily analytics rollup.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAnalytics {
    #[schema(example = 42)]
    pub total_employees: i64,
    #[schema(example = 37)]
    pub present_today: i64,
    #[schema(example = 30)]
    pub on_time_count: i64,
    #[schema(example = 5)]
    pub late_count: i64,
    #[schema(example = 88.1)]
    pub attendance_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn punctuality_wire_names() {
        assert_eq!(Punctuality::OnTime.to_string(), "on-time");
        assert_eq!(Punctuality::Early.to_string(), "early");
        assert_eq!(Punctuality::from_str("late").unwrap(), Punctuality::Late);
        assert_eq!(
            serde_json::to_string(&Punctuality::OnTime).unwrap(),
            "\"on-time\""
        );
    }
}
