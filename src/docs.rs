use crate::api::attendance::AttendanceListResponse;
use crate::api::device::CreateDevice;
use crate::api::employee::EmployeeListResponse;
use crate::model::attendance::AttendanceRecord;
use crate::model::daily_attendance::DailyAttendance;
use crate::model::device::Device;
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "zkbridge API",
        version = "1.0.0",
        description = r#"
## Biometric Attendance Bridge

Connects ZKTeco-style fingerprint/face terminals to an HR attendance ledger.

### 🔹 Key Features
- **Device Management**
  - Register terminals, test connections, set the device clock, restart
- **Attendance Download**
  - Pull the on-device punch log into the ledger, deduplicated, on demand or
    via a scheduled sweep over all active devices
- **Attendance Ledger**
  - Raw punch records with derived check-in/check-out fields
- **Daily Report**
  - Last punch per employee per day, recomputed on every query

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::device::create_device,
        crate::api::device::list_devices,
        crate::api::device::get_device,
        crate::api::device::update_device,
        crate::api::device::delete_device,
        crate::api::device::test_connection,
        crate::api::device::set_time,
        crate::api::device::restart_device,
        crate::api::device::clear_attendance,
        crate::api::device::download_attendance,

        crate::api::attendance::list_attendance,
        crate::api::attendance::daily_attendance,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
    ),
    components(
        schemas(
            Device,
            CreateDevice,
            Employee,
            EmployeeListResponse,
            AttendanceRecord,
            AttendanceListResponse,
            DailyAttendance
        )
    ),
    tags(
        (name = "Device", description = "Biometric terminal configuration and actions"),
        (name = "Attendance", description = "Punch ledger and daily report APIs"),
        (name = "Employee", description = "Employee device-mapping APIs"),
    )
)]
pub struct ApiDoc;
