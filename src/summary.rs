//! Daily attendance report: per (employee, calendar day), the most recent
//! punch. Recomputed on every query from the fetched ledger rows; ledger
//! sizes in this domain do not justify caching or a materialized view.

use crate::model::attendance::{AttendanceRecord, attendance_label, punch_label};
use crate::model::daily_attendance::DailyAttendance;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Fold ledger rows down to the last punch per (employee, day), ordered
/// globally by punching time descending.
pub fn daily_summary(
    rows: Vec<AttendanceRecord>,
    employee_names: &HashMap<u64, String>,
) -> Vec<DailyAttendance> {
    let mut latest: HashMap<(u64, NaiveDate), AttendanceRecord> = HashMap::new();
    for row in rows {
        let key = (row.employee_id, row.punching_time.date());
        match latest.get(&key) {
            Some(kept) if kept.punching_time >= row.punching_time => {}
            _ => {
                latest.insert(key, row);
            }
        }
    }

    let mut report: Vec<DailyAttendance> = latest
        .into_values()
        .map(|row| DailyAttendance {
            employee_id: row.employee_id,
            employee_name: employee_names.get(&row.employee_id).cloned(),
            punching_day: row.punching_time.date(),
            punching_time: row.punching_time,
            punch_label: punch_label(&row.punch_type),
            punch_type: row.punch_type,
            attendance_label: attendance_label(&row.attendance_type),
            attendance_type: row.attendance_type,
            address: row.address,
            company: row.company,
        })
        .collect();

    report.sort_by(|a, b| b.punching_time.cmp(&a.punching_time));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn row(id: u64, employee_id: u64, punching_time: NaiveDateTime, code: &str) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id,
            device_id_num: employee_id.to_string(),
            punching_time,
            punch_type: code.into(),
            attendance_type: "15".into(),
            check_in: None,
            check_out: None,
            address: None,
            company: None,
        }
    }

    #[test]
    fn one_row_per_employee_per_day_with_the_latest_punch() {
        let rows = vec![
            row(1, 1, ts(14, 9, 0), "0"),
            row(2, 1, ts(14, 17, 30), "1"),
            row(3, 1, ts(15, 9, 5), "0"),
            row(4, 2, ts(14, 9, 2), "0"),
        ];
        let report = daily_summary(rows, &HashMap::new());

        assert_eq!(report.len(), 3);
        let alice_day_one = report
            .iter()
            .find(|r| r.employee_id == 1 && r.punching_day == ts(14, 0, 0).date())
            .unwrap();
        assert_eq!(alice_day_one.punching_time, ts(14, 17, 30));
        assert_eq!(alice_day_one.punch_type, "1");
    }

    #[test]
    fn report_is_ordered_by_punching_time_descending() {
        let rows = vec![
            row(1, 1, ts(13, 9, 0), "0"),
            row(2, 2, ts(15, 9, 0), "0"),
            row(3, 3, ts(14, 9, 0), "0"),
        ];
        let report = daily_summary(rows, &HashMap::new());
        let times: Vec<_> = report.iter().map(|r| r.punching_time).collect();
        assert_eq!(times, vec![ts(15, 9, 0), ts(14, 9, 0), ts(13, 9, 0)]);
    }

    #[test]
    fn labels_are_advisory_and_absent_for_unknown_codes() {
        let mut names = HashMap::new();
        names.insert(1, "Alice Rahman".to_string());

        let report = daily_summary(vec![row(1, 1, ts(14, 9, 0), "99")], &names);
        assert_eq!(report[0].punch_type, "99");
        assert_eq!(report[0].punch_label, None);
        assert_eq!(report[0].attendance_label.as_deref(), Some("Face"));
        assert_eq!(report[0].employee_name.as_deref(), Some("Alice Rahman"));
    }

    #[test]
    fn empty_ledger_gives_an_empty_report() {
        assert!(daily_summary(Vec::new(), &HashMap::new()).is_empty());
    }
}
