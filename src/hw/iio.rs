use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use tokio::fs;

use crate::hw::{ClimateSensor, GasSensor};
use crate::measure::ADC_MAX;

const DHT11_TEMPERATURE_FILE: &str = "in_temp_input";
const DHT11_HUMIDITY_FILE: &str = "in_humidityrelative_input";

/// One ADC channel exposed by an IIO driver as `in_voltage<N>_raw`.
#[derive(Debug, Clone)]
pub struct IioAdc {
    path: PathBuf,
}

impl IioAdc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn channel(device_dir: impl AsRef<Path>, channel: u8) -> Self {
        Self::new(
            device_dir
                .as_ref()
                .join(format!("in_voltage{channel}_raw")),
        )
    }
}

impl GasSensor for IioAdc {
    async fn read_raw(&mut self) -> Result<u16> {
        let raw: u32 = read_attribute(&self.path).await?;
        if raw > ADC_MAX as u32 {
            bail!("ADC reading out of range: expected 0-{ADC_MAX}, got {raw}");
        }

        Ok(raw as u16)
    }
}

/// DHT11 through the kernel `dht11` IIO driver, which reports milli-degrees
/// Celsius and milli-percent relative humidity.
#[derive(Debug, Clone)]
pub struct IioDht11 {
    device_dir: PathBuf,
}

impl IioDht11 {
    pub fn new(device_dir: impl Into<PathBuf>) -> Self {
        Self {
            device_dir: device_dir.into(),
        }
    }

    async fn read_milli(&self, file: &str) -> Result<f32> {
        let milli: i32 = read_attribute(&self.device_dir.join(file)).await?;
        Ok(milli as f32 / 1000f32)
    }
}

impl ClimateSensor for IioDht11 {
    async fn init(&mut self) -> Result<()> {
        for file in [DHT11_TEMPERATURE_FILE, DHT11_HUMIDITY_FILE] {
            let path = self.device_dir.join(file);
            let exists = fs::try_exists(&path)
                .await
                .with_context(|| format!("failed to probe {}", path.display()))?;
            if !exists {
                bail!("DHT11 attribute not found: {}", path.display());
            }
        }

        Ok(())
    }

    async fn read_humidity(&mut self) -> Result<f32> {
        self.read_milli(DHT11_HUMIDITY_FILE)
            .await
            .context("failed to read humidity")
    }

    async fn read_temperature(&mut self) -> Result<f32> {
        self.read_milli(DHT11_TEMPERATURE_FILE)
            .await
            .context("failed to read temperature")
    }
}

async fn read_attribute<T>(path: &Path) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    contents
        .trim()
        .parse()
        .with_context(|| format!("failed to parse {}: {:?}", path.display(), contents.trim()))
}
