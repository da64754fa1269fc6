//! Vendor SDK seam for the biometric terminals.
//!
//! The wire protocol is a black box: everything the rest of the service
//! needs from a terminal goes through the [`DeviceSession`] trait, opened by
//! a [`DeviceConnector`]. Drivers are substitutable: the crate ships a
//! simulated driver for development and tests, and a real SDK driver plugs
//! in behind the same traits.
//!
//! All session operations are synchronous and blocking, matching the
//! request/response nature of the terminals. Callers bridge into async with
//! `web::block`.

pub mod simulated;

use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device unreachable or it rejected the connection. Non-fatal: surfaced
    /// to the operator, never a crash.
    #[error("unable to connect to device: {0}")]
    Connection(String),

    /// An SDK call failed mid-sequence on an established session.
    #[error("device protocol error: {0}")]
    Protocol(String),
}

/// One entry of the device's user registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUser {
    pub user_id: String,
    pub name: String,
}

/// One raw log entry as the device stores it. The timestamp is device-local
/// wall-clock time; conversion to UTC happens at import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPunch {
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    /// Detection method code (finger/face/password/card/...).
    pub status: u16,
    /// Punching type code (check in/out, break, overtime, ...).
    pub punch: u16,
}

/// An open connection to a terminal.
///
/// There is no incremental fetch: `get_attendance` always returns the full
/// on-device log. `disable`/`enable` suspend and resume on-device capture so
/// a read does not race the device appending to its own log.
pub trait DeviceSession {
    fn get_users(&mut self) -> Result<Vec<DeviceUser>, DeviceError>;
    fn get_attendance(&mut self) -> Result<Vec<RawPunch>, DeviceError>;
    fn clear_attendance(&mut self) -> Result<(), DeviceError>;
    fn set_time(&mut self, time: NaiveDateTime) -> Result<(), DeviceError>;
    fn restart(&mut self) -> Result<(), DeviceError>;
    fn disable(&mut self) -> Result<(), DeviceError>;
    fn enable(&mut self) -> Result<(), DeviceError>;
    fn disconnect(&mut self) -> Result<(), DeviceError>;
}

/// Factory opening sessions. One session per operation; no pooling, no reuse.
pub trait DeviceConnector: Send + Sync {
    fn connect(
        &self,
        ip: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Box<dyn DeviceSession + Send>, DeviceError>;
}

/// Resolve a driver by its configured name.
pub fn connector_from_name(name: &str) -> Option<Arc<dyn DeviceConnector>> {
    match name {
        "simulated" => Some(Arc::new(simulated::SimulatedConnector::default())),
        _ => None,
    }
}
