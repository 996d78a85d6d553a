use std::time::Duration;

use chrono_tz::Tz;

use crate::wait::Retry;

pub const DEFAULT_SENSOR_ID: i32 = 1;
pub const DEFAULT_BARANGAY_ID: i32 = 4;
pub const DEFAULT_ENDPOINT: &str = "https://bytetech-final1.onrender.com/create/sensor-data";
pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org:123";
/// UTC+8 all year round.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Manila;

pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);
pub const FAILURE_COOLDOWN: Duration = Duration::from_secs(2);
pub const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything the node needs, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub sensor_id: i32,

    pub barangay_id: i32,

    pub endpoint: String,

    pub ntp_server: String,

    pub timezone: Tz,

    /// Delay after a completed or skipped cycle.
    pub sample_interval: Duration,

    /// Delay after a cycle aborted by a sensor or clock failure. Replaces
    /// `sample_interval` rather than adding to it.
    pub failure_cooldown: Duration,

    pub connect_retry: Retry,

    pub clock_sync_retry: Retry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor_id: DEFAULT_SENSOR_ID,
            barangay_id: DEFAULT_BARANGAY_ID,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ntp_server: DEFAULT_NTP_SERVER.to_string(),
            timezone: DEFAULT_TIMEZONE,
            sample_interval: SAMPLE_INTERVAL,
            failure_cooldown: FAILURE_COOLDOWN,
            connect_retry: Retry::new(STARTUP_POLL_INTERVAL, STARTUP_TIMEOUT),
            clock_sync_retry: Retry::new(STARTUP_POLL_INTERVAL, STARTUP_TIMEOUT),
        }
    }
}
