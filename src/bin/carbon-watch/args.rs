use std::{path::PathBuf, time::Duration};

use carbon_watch::{
    config::{
        Config, DEFAULT_BARANGAY_ID, DEFAULT_ENDPOINT, DEFAULT_NTP_SERVER, DEFAULT_SENSOR_ID,
        DEFAULT_TIMEZONE, FAILURE_COOLDOWN, SAMPLE_INTERVAL, STARTUP_POLL_INTERVAL,
        STARTUP_TIMEOUT,
    },
    wait::Retry,
};
use chrono_tz::Tz;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "SENSOR_ID", default_value_t = DEFAULT_SENSOR_ID)]
    pub sensor_id: i32,

    #[arg(long, env = "BARANGAY_ID", default_value_t = DEFAULT_BARANGAY_ID)]
    pub barangay_id: i32,

    #[arg(long, env = "ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// SNTP server as `host:port`.
    #[arg(long, env = "NTP_SERVER", default_value = DEFAULT_NTP_SERVER)]
    pub ntp_server: String,

    #[arg(long, env = "TZ", default_value_t = DEFAULT_TIMEZONE)]
    pub timezone: Tz,

    /// Network interface whose operstate gates each cycle.
    #[arg(long, env = "INTERFACE", default_value = "wlan0")]
    pub interface: String,

    /// IIO attribute of the ADC channel wired to the gas sensor.
    #[arg(
        long,
        env = "GAS_ADC",
        default_value = "/sys/bus/iio/devices/iio:device0/in_voltage0_raw"
    )]
    pub gas_adc: PathBuf,

    /// IIO device directory of the DHT11.
    #[arg(long, env = "DHT_DEVICE", default_value = "/sys/bus/iio/devices/iio:device1")]
    pub dht_device: PathBuf,

    #[arg(long, default_value_t = SAMPLE_INTERVAL.as_secs())]
    pub interval_secs: u64,

    #[arg(long, default_value_t = FAILURE_COOLDOWN.as_secs())]
    pub cooldown_secs: u64,

    /// Upper bound on each startup wait (network, then clock).
    #[arg(long, default_value_t = STARTUP_TIMEOUT.as_secs())]
    pub startup_timeout_secs: u64,

    #[arg(long, default_value_t = STARTUP_POLL_INTERVAL.as_millis() as u64)]
    pub startup_poll_ms: u64,
}

impl Args {
    pub fn to_config(&self) -> Config {
        let startup = Retry::new(
            Duration::from_millis(self.startup_poll_ms),
            Duration::from_secs(self.startup_timeout_secs),
        );

        Config {
            sensor_id: self.sensor_id,
            barangay_id: self.barangay_id,
            endpoint: self.endpoint.clone(),
            ntp_server: self.ntp_server.clone(),
            timezone: self.timezone,
            sample_interval: Duration::from_secs(self.interval_secs),
            failure_cooldown: Duration::from_secs(self.cooldown_secs),
            connect_retry: startup,
            clock_sync_retry: startup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_build_time_constants() {
        let args = Args::try_parse_from(["carbon-watch"]).unwrap();
        let config = args.to_config();
        let defaults = Config::default();

        assert_eq!(config.endpoint, defaults.endpoint);
        assert_eq!(config.sample_interval, defaults.sample_interval);
        assert_eq!(config.failure_cooldown, defaults.failure_cooldown);
        assert_eq!(config.connect_retry, defaults.connect_retry);
        assert_eq!(config.clock_sync_retry, defaults.clock_sync_retry);
    }

    #[test]
    fn overrides_identity_and_timing() {
        let args = Args::try_parse_from([
            "carbon-watch",
            "--sensor-id",
            "7",
            "--barangay-id",
            "12",
            "--interval-secs",
            "30",
            "--startup-timeout-secs",
            "10",
        ])
        .unwrap();
        let config = args.to_config();

        assert_eq!(config.sensor_id, 7);
        assert_eq!(config.barangay_id, 12);
        assert_eq!(config.sample_interval, Duration::from_secs(30));
        assert_eq!(config.connect_retry.timeout, Duration::from_secs(10));
    }
}
