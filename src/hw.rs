//! Hardware the node talks to, and their Linux sysfs bindings.

mod iio;
mod link;

use std::future::Future;

use anyhow::Result;

pub use iio::*;
pub use link::*;

/// Analog gas sensor behind an ADC.
pub trait GasSensor {
    /// Raw ADC count in `0..=ADC_MAX`.
    fn read_raw(&mut self) -> impl Future<Output = Result<u16>>;
}

/// Temperature/humidity sensor.
///
/// A read may fail outright or produce NaN; callers treat both as an invalid
/// sample.
pub trait ClimateSensor {
    fn init(&mut self) -> impl Future<Output = Result<()>>;

    fn read_humidity(&mut self) -> impl Future<Output = Result<f32>>;

    fn read_temperature(&mut self) -> impl Future<Output = Result<f32>>;
}

/// Network uplink state.
pub trait Link {
    fn is_connected(&self) -> impl Future<Output = bool>;
}
