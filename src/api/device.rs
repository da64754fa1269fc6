use crate::{
    config::Config,
    device::{DeviceConnector, DeviceError},
    importer::{self, ImportError},
    model::device::Device,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{
    HttpResponse, Responder,
    error::{ErrorInternalServerError, ErrorNotFound},
    web,
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

/// Columns an operator may change on a configured device.
const UPDATABLE_COLUMNS: &[&str] = &[
    "name",
    "device_ip",
    "port_number",
    "address",
    "company",
    "active",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateDevice {
    #[schema(example = "Main Gate Terminal")]
    pub name: String,
    #[schema(example = "192.168.1.201")]
    pub device_ip: String,
    #[schema(example = 4370)]
    pub port_number: u16,
    #[schema(example = "Head Office, Building A", nullable = true)]
    pub address: Option<String>,
    #[schema(example = "Acme Ltd", nullable = true)]
    pub company: Option<String>,
    #[schema(example = true)]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub active: Option<bool>,
}

async fn load_device(pool: &MySqlPool, id: u64) -> Result<Device, actix_web::Error> {
    let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, device_id = id, "Failed to fetch device");
            ErrorInternalServerError("Internal Server Error")
        })?;

    device.ok_or_else(|| ErrorNotFound("Device not found"))
}

fn device_error_response(device: &Device, e: &DeviceError) -> HttpResponse {
    match e {
        DeviceError::Connection(_) => HttpResponse::BadGateway().json(json!({
            "message": format!(
                "Unable to connect to '{}'. Please check the device configuration.",
                device.name
            )
        })),
        DeviceError::Protocol(_) => HttpResponse::InternalServerError().json(json!({
            "message": format!("Device '{}' failed during the operation", device.name)
        })),
    }
}

/// Register a device
#[utoipa::path(
    post,
    path = "/api/devices",
    request_body = CreateDevice,
    responses(
        (status = 200, description = "Device registered", body = Object, example = json!({
            "message": "Device registered successfully"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Device"
)]
pub async fn create_device(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDevice>,
) -> impl Responder {
    let result = sqlx::query(
        r#"
        INSERT INTO devices (name, device_ip, port_number, address, company, active)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.device_ip)
    .bind(payload.port_number)
    .bind(&payload.address)
    .bind(&payload.company)
    .bind(payload.active.unwrap_or(true))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => HttpResponse::Ok().json(json!({
            "message": "Device registered successfully",
            "id": done.last_insert_id()
        })),
        Err(e) => {
            error!(error = %e, "Failed to register device");
            HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            }))
        }
    }
}

/// List devices
#[utoipa::path(
    get,
    path = "/api/devices",
    params(
        ("active", Query, description = "Filter by active flag")
    ),
    responses(
        (status = 200, description = "Configured devices", body = [Device])
    ),
    tag = "Device"
)]
pub async fn list_devices(
    pool: web::Data<MySqlPool>,
    query: web::Query<DeviceQuery>,
) -> actix_web::Result<impl Responder> {
    let sql = match query.active {
        Some(_) => "SELECT * FROM devices WHERE active = ? ORDER BY id",
        None => "SELECT * FROM devices ORDER BY id",
    };

    let mut data_query = sqlx::query_as::<_, Device>(sql);
    if let Some(active) = query.active {
        data_query = data_query.bind(active);
    }

    let devices = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch devices");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(devices))
}

/// Get a device by ID
#[utoipa::path(
    get,
    path = "/api/devices/{id}",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Device found", body = Device),
        (status = 404, description = "Device not found")
    ),
    tag = "Device"
)]
pub async fn get_device(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device = load_device(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(device))
}

/// Update a device
#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Device updated"),
        (status = 400, description = "Unknown field in payload"),
        (status = 404, description = "Device not found")
    ),
    tag = "Device"
)]
pub async fn update_device(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let device_id = path.into_inner();

    let update = build_update_sql("devices", UPDATABLE_COLUMNS, &body, "id", device_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Device not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Device updated successfully" })))
}

/// Delete a device
#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Device not found")
    ),
    tag = "Device"
)]
pub async fn delete_device(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device_id = path.into_inner();

    let result = sqlx::query("DELETE FROM devices WHERE id = ?")
        .bind(device_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Device not found"
                })));
            }
            Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
        }
        Err(e) => {
            error!(error = %e, device_id, "Failed to delete device");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Test the connection to a device
#[utoipa::path(
    post,
    path = "/api/devices/{id}/test-connection",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Connected", body = Object, example = json!({
            "message": "Successfully connected"
        })),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Device unreachable")
    ),
    tag = "Device"
)]
pub async fn test_connection(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    connector: web::Data<Arc<dyn DeviceConnector>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device = load_device(pool.get_ref(), path.into_inner()).await?;

    let ip = device.device_ip.clone();
    let port = device.port_number;
    let timeout = config.device_timeout();
    let connector = connector.get_ref().clone();

    let result = web::block(move || {
        let mut session = connector.connect(&ip, port, timeout)?;
        session.disconnect()
    })
    .await
    .map_err(ErrorInternalServerError)?;

    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "message": "Successfully connected" }))),
        Err(e) => {
            error!(error = %e, device = %device.name, "Connection test failed");
            Ok(device_error_response(&device, &e))
        }
    }
}

/// Push the current time to a device
#[utoipa::path(
    post,
    path = "/api/devices/{id}/set-time",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Clock set", body = Object, example = json!({
            "message": "Successfully set the device time"
        })),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Device unreachable")
    ),
    tag = "Device"
)]
pub async fn set_time(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    connector: web::Data<Arc<dyn DeviceConnector>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device = load_device(pool.get_ref(), path.into_inner()).await?;

    // the device keeps wall-clock time in the operator's zone
    let now_local = chrono::Utc::now()
        .with_timezone(&config.timezone)
        .naive_local();

    let ip = device.device_ip.clone();
    let port = device.port_number;
    let timeout = config.device_timeout();
    let connector = connector.get_ref().clone();

    let result = web::block(move || {
        let mut session = connector.connect(&ip, port, timeout)?;
        let set = session.set_time(now_local);
        let _ = session.disconnect();
        set
    })
    .await
    .map_err(ErrorInternalServerError)?;

    match result {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(json!({ "message": "Successfully set the device time" })))
        }
        Err(e) => {
            error!(error = %e, device = %device.name, "Failed to set device time");
            Ok(device_error_response(&device, &e))
        }
    }
}

/// Restart a device
#[utoipa::path(
    post,
    path = "/api/devices/{id}/restart",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Restart initiated", body = Object, example = json!({
            "message": "Device restart initiated successfully"
        })),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Device unreachable")
    ),
    tag = "Device"
)]
pub async fn restart_device(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    connector: web::Data<Arc<dyn DeviceConnector>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device = load_device(pool.get_ref(), path.into_inner()).await?;

    let ip = device.device_ip.clone();
    let port = device.port_number;
    let timeout = config.device_timeout();
    let connector = connector.get_ref().clone();

    let result = web::block(move || {
        let mut session = connector.connect(&ip, port, timeout)?;
        let restart = session.restart();
        // the device is rebooting; a failed disconnect is expected
        let _ = session.disconnect();
        restart
    })
    .await
    .map_err(ErrorInternalServerError)?;

    match result {
        Ok(()) => Ok(
            HttpResponse::Ok().json(json!({ "message": "Device restart initiated successfully" }))
        ),
        Err(e) => {
            error!(error = %e, device = %device.name, "Failed to restart device");
            Ok(device_error_response(&device, &e))
        }
    }
}

enum ClearOutcome {
    Empty,
    Cleared,
}

/// Clear attendance logs on a device and in the ledger
#[utoipa::path(
    post,
    path = "/api/devices/{id}/clear-attendance",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Cleared", body = Object, example = json!({
            "message": "Successfully cleared attendance data"
        })),
        (status = 400, description = "Nothing to clear", body = Object, example = json!({
            "message": "No attendance records found to clear"
        })),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Device unreachable")
    ),
    tag = "Device"
)]
pub async fn clear_attendance(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    connector: web::Data<Arc<dyn DeviceConnector>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device = load_device(pool.get_ref(), path.into_inner()).await?;

    let ip = device.device_ip.clone();
    let port = device.port_number;
    let timeout = config.device_timeout();
    let connector = connector.get_ref().clone();

    let result = web::block(move || -> Result<ClearOutcome, DeviceError> {
        let mut session = connector.connect(&ip, port, timeout)?;
        let outcome = (|| {
            session.enable()?;
            let log = session.get_attendance()?;
            if log.is_empty() {
                return Ok(ClearOutcome::Empty);
            }
            session.clear_attendance()?;
            Ok(ClearOutcome::Cleared)
        })();
        let _ = session.disconnect();
        outcome
    })
    .await
    .map_err(ErrorInternalServerError)?;

    match result {
        Ok(ClearOutcome::Empty) => Ok(HttpResponse::BadRequest().json(json!({
            "message": "No attendance records found to clear"
        }))),
        Ok(ClearOutcome::Cleared) => {
            // the device log is gone; purge the ledger to match
            sqlx::query("DELETE FROM attendance")
                .execute(pool.get_ref())
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to purge attendance ledger");
                    ErrorInternalServerError("Internal Server Error")
                })?;
            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully cleared attendance data"
            })))
        }
        Err(e) => {
            error!(error = %e, device = %device.name, "Failed to clear attendance");
            Ok(device_error_response(&device, &e))
        }
    }
}

/// Download attendance logs from a device into the ledger
#[utoipa::path(
    post,
    path = "/api/devices/{id}/download",
    params(
        ("id", Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Download finished", body = Object, example = json!({
            "message": "Successfully downloaded 12 attendance records"
        })),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Device unreachable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Device"
)]
pub async fn download_attendance(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    connector: web::Data<Arc<dyn DeviceConnector>>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let device = load_device(pool.get_ref(), path.into_inner()).await?;

    let result = importer::run_import(
        pool.get_ref(),
        connector.get_ref().clone(),
        &device,
        config.timezone,
        config.device_timeout(),
    )
    .await;

    match result {
        Ok(0) => Ok(HttpResponse::Ok().json(json!({
            "message": "No new attendance records found"
        }))),
        Ok(inserted) => Ok(HttpResponse::Ok().json(json!({
            "message": format!("Successfully downloaded {inserted} attendance records"),
            "inserted": inserted
        }))),
        Err(ImportError::Device(e)) => {
            error!(error = %e, device = %device.name, "Attendance download failed");
            Ok(device_error_response(&device, &e))
        }
        Err(e) => {
            error!(error = %e, device = %device.name, "Attendance download failed");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
