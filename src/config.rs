use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    /// Transport connect timeout handed to the device driver.
    pub device_timeout_secs: u64,
    /// 0 disables the scheduled sweep.
    pub sweep_interval_secs: u64,
    /// Zone the device wall-clocks run in; punches are converted from this
    /// zone to UTC at import.
    pub timezone: Tz,
    pub device_driver: String,

    // Rate limiting
    pub rate_action_per_min: u32,
    pub rate_api_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            device_timeout_secs: env::var("DEVICE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap(),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string()) // default 5 min
                .parse()
                .unwrap(),
            timezone: env::var("TIMEZONE")
                .unwrap_or_else(|_| "UTC".to_string())
                .parse()
                .expect("TIMEZONE must be a valid IANA zone name"),
            device_driver: env::var("DEVICE_DRIVER").unwrap_or_else(|_| "simulated".to_string()),

            rate_action_per_min: env::var("RATE_ACTION_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }
}
