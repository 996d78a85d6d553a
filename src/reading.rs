use std::fmt::Display;

use anyhow::{Context as _, Result};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::measure::CarbonLevel;

const MINUTE_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:00";

/// One sample, built fresh each cycle and dropped after the upload attempt.
///
/// Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_id: i32,

    pub barangay_id: i32,

    pub co2_density: f32,

    pub temperature_c: f32,

    pub humidity: f32,

    pub heat_index_c: f32,

    pub carbon_level: CarbonLevel,

    pub minute_stamp: String,
}

impl Reading {
    /// Compact JSON body. Non-finite floats become `null`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize reading")
    }
}

/// Formats `at` in its own zone with the seconds forced to `00`.
pub fn minute_stamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(MINUTE_STAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use chrono_tz::Asia::Manila;
    use serde_json::Value;

    use super::*;

    fn sample() -> Reading {
        Reading {
            sensor_id: 1,
            barangay_id: 4,
            co2_density: 0.1234,
            temperature_c: 31.0,
            humidity: 74.0,
            heat_index_c: 38.92,
            carbon_level: CarbonLevel::Normal,
            minute_stamp: "2024-01-05 14:37:00".to_string(),
        }
    }

    #[test]
    fn minute_stamp_zeroes_seconds_without_rounding() {
        let at = Manila.with_ymd_and_hms(2024, 1, 5, 14, 37, 52).unwrap();
        assert_eq!(minute_stamp(&at), "2024-01-05 14:37:00");
    }

    #[test]
    fn minute_stamp_uses_the_local_offset() {
        let utc = chrono::Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 59).unwrap();
        let local = utc.with_timezone(&FixedOffset::east_opt(8 * 3600).unwrap());
        assert_eq!(minute_stamp(&local), "2024-01-06 07:59:00");
    }

    #[test]
    fn serializes_fields_in_wire_order() {
        let json = sample().to_json().unwrap();
        let keys = [
            "sensor_id",
            "barangay_id",
            "co2_density",
            "temperature_c",
            "humidity",
            "heat_index_c",
            "carbon_level",
            "minute_stamp",
        ];

        let positions: Vec<usize> = keys
            .iter()
            .map(|k| json.find(&format!("\"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(!json.contains(": ") && !json.contains(", "), "{json}");
        assert!(json.contains("\"carbon_level\":\"NORMAL\""));
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let reading = sample();
        let parsed: Reading = serde_json::from_str(&reading.to_json().unwrap()).unwrap();

        assert_eq!(parsed.sensor_id, reading.sensor_id);
        assert_eq!(parsed.barangay_id, reading.barangay_id);
        assert!((parsed.co2_density - reading.co2_density).abs() < f32::EPSILON);
        assert!((parsed.temperature_c - reading.temperature_c).abs() < f32::EPSILON);
        assert!((parsed.humidity - reading.humidity).abs() < f32::EPSILON);
        assert!((parsed.heat_index_c - reading.heat_index_c).abs() < f32::EPSILON);
        assert_eq!(parsed.carbon_level, reading.carbon_level);
        assert_eq!(parsed.minute_stamp, reading.minute_stamp);
    }

    #[test]
    fn saturated_density_is_sent_as_null() {
        let reading = Reading {
            co2_density: f32::INFINITY,
            carbon_level: CarbonLevel::VeryHigh,
            ..sample()
        };

        let value: Value = serde_json::from_str(&reading.to_json().unwrap()).unwrap();
        assert!(value["co2_density"].is_null());
        assert_eq!(value["carbon_level"], "VERY HIGH");
    }
}
