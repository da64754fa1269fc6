use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
/// Only columns named in `allowed` may appear in the payload; anything else
/// is rejected before the SQL is built.
pub fn build_update_sql(
    table: &str,
    allowed: &[&str],
    payload: &Value,
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(unknown) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!(
            "Field '{}' cannot be updated",
            unknown
        )));
    }

    // Build SET clause
    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Convert JSON values → SqlValue
    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Pagination offset
/// ===============================
/// Widened to u64 before multiplying so absurd page numbers cannot overflow
/// the u32 arithmetic.
pub fn page_offset(page: u32, per_page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(per_page)
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DEVICE_COLUMNS: &[&str] = &["name", "device_ip", "port_number", "active"];

    #[test]
    fn builds_set_clause_for_whitelisted_columns() {
        let payload = json!({ "active": false, "name": "Warehouse Gate" });
        let update = build_update_sql("devices", DEVICE_COLUMNS, &payload, "id", 3).unwrap();

        assert_eq!(
            update.sql,
            "UPDATE devices SET active = ?, name = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
        assert!(matches!(update.values[0], SqlValue::Bool(false)));
        assert!(matches!(update.values[2], SqlValue::U64(3)));
    }

    #[test]
    fn rejects_columns_outside_the_whitelist() {
        let payload = json!({ "name": "ok", "id": 99 });
        let err = build_update_sql("devices", DEVICE_COLUMNS, &payload, "id", 3);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(build_update_sql("devices", DEVICE_COLUMNS, &json!({}), "id", 3).is_err());
        assert!(build_update_sql("devices", DEVICE_COLUMNS, &json!([1, 2]), "id", 3).is_err());
    }

    #[test]
    fn page_offset_survives_huge_page_numbers() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(
            page_offset(u32::MAX, 100),
            (u64::from(u32::MAX) - 1) * 100
        );
    }

    #[test]
    fn date_looking_strings_bind_as_dates() {
        let payload = json!({ "name": "2025-03-14" });
        let update = build_update_sql("devices", DEVICE_COLUMNS, &payload, "id", 1).unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }
}
