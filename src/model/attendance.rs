use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// One raw punch event downloaded from a terminal.
///
/// `punch_type` and `attendance_type` hold the device's raw code strings.
/// The enums below label the codes the uFace line is known to emit, but the
/// ledger never rejects a code outside that set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 10,
        "employee_id": 1,
        "device_id_num": "7",
        "punching_time": "2025-03-14T03:12:09",
        "punch_type": "0",
        "attendance_type": "15",
        "check_in": "2025-03-14T03:12:09",
        "check_out": null,
        "address": "Head Office, Building A",
        "company": "Acme Ltd"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 10)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    /// Device-assigned user identifier, half of the dedup key.
    #[schema(example = "7")]
    pub device_id_num: String,

    /// Punch timestamp, already converted to UTC. The other half of the
    /// dedup key.
    #[schema(example = "2025-03-14T03:12:09", value_type = String, format = "date-time")]
    pub punching_time: NaiveDateTime,

    #[schema(example = "0")]
    pub punch_type: String,

    #[schema(example = "15")]
    pub attendance_type: String,

    /// Set iff punch_type is "0".
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_in: Option<NaiveDateTime>,

    /// Set iff punch_type is "1".
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out: Option<NaiveDateTime>,

    #[schema(nullable = true)]
    pub address: Option<String>,

    #[schema(nullable = true)]
    pub company: Option<String>,
}

/// Punching type codes as the device reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PunchType {
    #[strum(serialize = "0", to_string = "Check In")]
    CheckIn,
    #[strum(serialize = "1", to_string = "Check Out")]
    CheckOut,
    #[strum(serialize = "2", to_string = "Break Out")]
    BreakOut,
    #[strum(serialize = "3", to_string = "Break In")]
    BreakIn,
    #[strum(serialize = "4", to_string = "Overtime In")]
    OvertimeIn,
    #[strum(serialize = "5", to_string = "Overtime Out")]
    OvertimeOut,
    #[strum(serialize = "255", to_string = "Duplicate")]
    Duplicate,
}

/// Detection method codes (how the device identified the person).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AttendanceType {
    #[strum(serialize = "1", to_string = "Finger")]
    Finger,
    #[strum(serialize = "2", to_string = "Type_2")]
    Type2,
    #[strum(serialize = "3", to_string = "Password")]
    Password,
    #[strum(serialize = "4", to_string = "Card")]
    Card,
    #[strum(serialize = "15", to_string = "Face")]
    Face,
    #[strum(serialize = "255", to_string = "Duplicate")]
    Duplicate,
}

/// Human label for a raw punch code, None when the code is outside the
/// known set.
pub fn punch_label(code: &str) -> Option<String> {
    PunchType::from_str(code).ok().map(|p| p.to_string())
}

pub fn attendance_label(code: &str) -> Option<String> {
    AttendanceType::from_str(code).ok().map(|a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_punch_codes_map_to_labels() {
        assert_eq!(punch_label("0").as_deref(), Some("Check In"));
        assert_eq!(punch_label("1").as_deref(), Some("Check Out"));
        assert_eq!(punch_label("255").as_deref(), Some("Duplicate"));
    }

    #[test]
    fn unknown_codes_have_no_label() {
        assert_eq!(punch_label("99"), None);
        assert_eq!(attendance_label("42"), None);
    }

    #[test]
    fn detection_codes_map_to_labels() {
        assert_eq!(attendance_label("1").as_deref(), Some("Finger"));
        assert_eq!(attendance_label("15").as_deref(), Some("Face"));
    }
}
