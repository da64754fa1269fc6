//! In-memory terminal driver.
//!
//! Behaves like a real terminal at the trait boundary: holds a user registry
//! and a punch log, supports clearing, clock set and capture enable/disable,
//! and can be scripted to refuse connections or fail mid-sequence. Used as
//! the default `DEVICE_DRIVER=simulated` wiring and throughout the tests.

use super::{DeviceConnector, DeviceError, DeviceSession, DeviceUser, RawPunch};
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Every trait call a session makes, in order. Tests assert on this to pin
/// the disable -> read -> enable -> disconnect sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Connect,
    GetUsers,
    GetAttendance,
    ClearAttendance,
    SetTime,
    Restart,
    Disable,
    Enable,
    Disconnect,
}

#[derive(Default)]
struct State {
    users: Vec<DeviceUser>,
    punches: Vec<RawPunch>,
    refuse_connect: bool,
    fail_get_attendance: bool,
    clock: Option<NaiveDateTime>,
    restarted: bool,
    capture_enabled: bool,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub struct SimulatedConnector {
    state: Arc<Mutex<State>>,
}

impl SimulatedConnector {
    pub fn with_users(self, users: Vec<DeviceUser>) -> Self {
        self.state.lock().unwrap().users = users;
        self
    }

    pub fn with_punches(self, punches: Vec<RawPunch>) -> Self {
        self.state.lock().unwrap().punches = punches;
        self
    }

    /// Script connection refusal (unplugged device, wrong IP).
    pub fn refuse_connect(self) -> Self {
        self.state.lock().unwrap().refuse_connect = true;
        self
    }

    /// Script a protocol failure on the next `get_attendance`.
    pub fn fail_on_get_attendance(self) -> Self {
        self.state.lock().unwrap().fail_get_attendance = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn log_len(&self) -> usize {
        self.state.lock().unwrap().punches.len()
    }

    pub fn clock(&self) -> Option<NaiveDateTime> {
        self.state.lock().unwrap().clock
    }

    pub fn restarted(&self) -> bool {
        self.state.lock().unwrap().restarted
    }

    /// Whether on-device capture is currently enabled.
    pub fn capture_enabled(&self) -> bool {
        self.state.lock().unwrap().capture_enabled
    }
}

impl DeviceConnector for SimulatedConnector {
    fn connect(
        &self,
        ip: &str,
        port: u16,
        _timeout: Duration,
    ) -> Result<Box<dyn DeviceSession + Send>, DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Connect);
        if state.refuse_connect {
            return Err(DeviceError::Connection(format!(
                "connection refused by {ip}:{port}"
            )));
        }
        state.capture_enabled = true;
        Ok(Box::new(SimulatedDevice {
            state: self.state.clone(),
        }))
    }
}

pub struct SimulatedDevice {
    state: Arc<Mutex<State>>,
}

impl DeviceSession for SimulatedDevice {
    fn get_users(&mut self) -> Result<Vec<DeviceUser>, DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetUsers);
        Ok(state.users.clone())
    }

    fn get_attendance(&mut self) -> Result<Vec<RawPunch>, DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetAttendance);
        if state.fail_get_attendance {
            return Err(DeviceError::Protocol(
                "attendance read aborted by device".into(),
            ));
        }
        Ok(state.punches.clone())
    }

    fn clear_attendance(&mut self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ClearAttendance);
        state.punches.clear();
        Ok(())
    }

    fn set_time(&mut self, time: NaiveDateTime) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SetTime);
        state.clock = Some(time);
        Ok(())
    }

    fn restart(&mut self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Restart);
        state.restarted = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Disable);
        state.capture_enabled = false;
        Ok(())
    }

    fn enable(&mut self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Enable);
        state.capture_enabled = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Disconnect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn ts(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn refused_connection_is_a_connection_error() {
        let connector = SimulatedConnector::default().refuse_connect();
        let err = connector
            .connect("10.0.0.9", 4370, Duration::from_secs(15))
            .err()
            .unwrap();
        assert!(matches!(err, DeviceError::Connection(_)));
        assert_eq!(connector.calls(), vec![Call::Connect]);
    }

    #[test]
    fn clear_attendance_empties_the_log() {
        let connector = SimulatedConnector::default().with_punches(vec![RawPunch {
            user_id: "7".into(),
            timestamp: ts(9, 0),
            status: 1,
            punch: 0,
        }]);
        let mut session = connector
            .connect("10.0.0.9", 4370, Duration::from_secs(15))
            .unwrap();
        session.clear_attendance().unwrap();
        session.disconnect().unwrap();
        assert_eq!(connector.log_len(), 0);
    }

    #[test]
    fn set_time_and_restart_reach_the_device() {
        let connector = SimulatedConnector::default();
        let mut session = connector
            .connect("10.0.0.9", 4370, Duration::from_secs(15))
            .unwrap();
        session.set_time(ts(12, 0)).unwrap();
        session.restart().unwrap();
        session.disconnect().unwrap();

        assert_eq!(connector.clock(), Some(ts(12, 0)));
        assert!(connector.restarted());
    }

    #[test]
    fn injected_protocol_failure_surfaces_mid_sequence() {
        let connector = SimulatedConnector::default().fail_on_get_attendance();
        let mut session = connector
            .connect("10.0.0.9", 4370, Duration::from_secs(15))
            .unwrap();
        session.disable().unwrap();
        let err = session.get_attendance().err().unwrap();
        assert!(matches!(err, DeviceError::Protocol(_)));
    }
}
