use std::{fmt, str::FromStr};

use anyhow::{Error, bail};
use serde::{Deserialize, Serialize};

/// Upper bounds (exclusive) of the LOW, NORMAL and HIGH bands, in g/m³.
pub const LOW_UPPER_BOUND: f32 = 0.08;
pub const NORMAL_UPPER_BOUND: f32 = 0.15;
pub const HIGH_UPPER_BOUND: f32 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CarbonLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
}

impl CarbonLevel {
    /// Bands are half-open, so a density equal to a bound belongs to the band
    /// above it. Anything that fails every comparison (including NaN) is
    /// `VeryHigh`.
    pub fn classify(co2_density: f32) -> Self {
        if co2_density < LOW_UPPER_BOUND {
            CarbonLevel::Low
        } else if co2_density < NORMAL_UPPER_BOUND {
            CarbonLevel::Normal
        } else if co2_density < HIGH_UPPER_BOUND {
            CarbonLevel::High
        } else {
            CarbonLevel::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarbonLevel::Low => "LOW",
            CarbonLevel::Normal => "NORMAL",
            CarbonLevel::High => "HIGH",
            CarbonLevel::VeryHigh => "VERY HIGH",
        }
    }
}

impl fmt::Display for CarbonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarbonLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(CarbonLevel::Low),
            "NORMAL" => Ok(CarbonLevel::Normal),
            "HIGH" => Ok(CarbonLevel::High),
            "VERY HIGH" => Ok(CarbonLevel::VeryHigh),
            _ => bail!("unknown carbon level: {}", s),
        }
    }
}
