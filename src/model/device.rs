use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A configured biometric terminal (ZKTeco uFace style: fingerprint + face).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Main Gate Terminal",
        "device_ip": "192.168.1.201",
        "port_number": 4370,
        "address": "Head Office, Building A",
        "company": "Acme Ltd",
        "active": true
    })
)]
pub struct Device {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Main Gate Terminal")]
    pub name: String,

    #[schema(example = "192.168.1.201")]
    pub device_ip: String,

    #[schema(example = 4370)]
    pub port_number: u16,

    /// Working address the terminal is installed at.
    #[schema(example = "Head Office, Building A", nullable = true)]
    pub address: Option<String>,

    #[schema(example = "Acme Ltd", nullable = true)]
    pub company: Option<String>,

    /// Inactive devices are skipped by the scheduled sweep.
    #[schema(example = true)]
    pub active: bool,
}
