use crate::model::attendance::AttendanceRecord;
use crate::model::daily_attendance::DailyAttendance;
use crate::summary::daily_summary;
use crate::utils::db_utils::page_offset;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub employee_id: Option<u64>,
    pub device_id_num: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 134)]
    pub total: i64,
}

fn build_filters(query: &AttendanceQuery) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        conditions.push("employee_id = ?");
        bindings.push(employee_id.to_string());
    }

    if let Some(device_id_num) = &query.device_id_num {
        conditions.push("device_id_num = ?");
        bindings.push(device_id_num.clone());
    }

    if let Some(from) = query.from {
        conditions.push("DATE(punching_time) >= ?");
        bindings.push(from.to_string());
    }

    if let Some(to) = query.to {
        conditions.push("DATE(punching_time) <= ?");
        bindings.push(to.to_string());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bindings)
}

/// Raw punch ledger
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("employee_id", Query, description = "Filter by employee"),
        ("device_id_num", Query, description = "Filter by device user id"),
        ("from", Query, description = "First day (UTC), YYYY-MM-DD"),
        ("to", Query, description = "Last day (UTC), YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Paginated punch records", body = AttendanceListResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = page_offset(page, per_page);

    let (where_clause, bindings) = build_filters(&query);

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM attendance {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting attendance records");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count attendance records");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM attendance {} ORDER BY punching_time DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, "Fetching attendance records");

    let mut data_query = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let records = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch attendance records");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page,
        per_page,
        total,
    }))
}

/// Daily attendance report: the last punch per employee per day
#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    params(
        ("employee_id", Query, description = "Filter by employee"),
        ("from", Query, description = "First day (UTC), YYYY-MM-DD"),
        ("to", Query, description = "Last day (UTC), YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Daily report rows", body = [DailyAttendance])
    ),
    tag = "Attendance"
)]
pub async fn daily_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let (where_clause, bindings) = build_filters(&query);

    let data_sql = format!(
        "SELECT * FROM attendance {} ORDER BY punching_time DESC",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, "Fetching ledger rows for daily report");

    let mut data_query = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }

    let rows = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch ledger rows");
        ErrorInternalServerError("Database error")
    })?;

    let names = employee_names(pool.get_ref(), &rows).await.map_err(|e| {
        error!(error = %e, "Failed to fetch employee names");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(daily_summary(rows, &names)))
}

async fn employee_names(
    pool: &MySqlPool,
    rows: &[AttendanceRecord],
) -> Result<HashMap<u64, String>, sqlx::Error> {
    let ids: Vec<u64> = {
        let mut ids: Vec<u64> = rows.iter().map(|r| r.employee_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, name FROM employees WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, (u64, String)>(&sql);
    for id in &ids {
        query = query.bind(id);
    }

    Ok(query.fetch_all(pool).await?.into_iter().collect())
}
