use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

/// One row of the daily attendance report: the last punch of an employee on
/// a given day. Derived, never stored; recomputed on every query.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1,
        "employee_name": "Alice Rahman",
        "punching_day": "2025-03-14",
        "punching_time": "2025-03-14T12:01:44",
        "punch_type": "1",
        "punch_label": "Check Out",
        "attendance_type": "15",
        "attendance_label": "Face",
        "address": "Head Office, Building A",
        "company": "Acme Ltd"
    })
)]
pub struct DailyAttendance {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "Alice Rahman", nullable = true)]
    pub employee_name: Option<String>,

    #[schema(example = "2025-03-14", value_type = String, format = "date")]
    pub punching_day: NaiveDate,

    #[schema(example = "2025-03-14T12:01:44", value_type = String, format = "date-time")]
    pub punching_time: NaiveDateTime,

    #[schema(example = "1")]
    pub punch_type: String,

    /// Advisory label, absent for codes outside the known set.
    #[schema(example = "Check Out", nullable = true)]
    pub punch_label: Option<String>,

    #[schema(example = "15")]
    pub attendance_type: String,

    #[schema(example = "Face", nullable = true)]
    pub attendance_label: Option<String>,

    #[schema(nullable = true)]
    pub address: Option<String>,

    #[schema(nullable = true)]
    pub company: Option<String>,
}
