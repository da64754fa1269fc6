pub mod attendance;
pub mod daily_attendance;
pub mod device;
pub mod employee;
