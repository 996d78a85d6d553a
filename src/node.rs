//! The sample-classify-publish loop.

use std::{future::Future, pin::pin, time::Duration};

use anyhow::{Context as _, Result};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    config::Config,
    hw::{ClimateSensor, GasSensor, Link},
    measure::{CarbonLevel, estimate_gas, heat_index_celsius},
    reading::{Reading, minute_stamp},
    upload::{PublishOutcome, Publisher},
};

/// How a cycle ended. Every variant is terminal for that cycle's reading.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No uplink; nothing was sampled.
    Offline,

    GasReadFailed,

    /// Humidity or temperature errored or came back NaN.
    ClimateReadFailed,

    ClockUnavailable,

    Published(PublishOutcome),
}

impl CycleOutcome {
    /// Delay before the next cycle. Aborted cycles wait the cooldown instead of
    /// the full interval.
    pub fn next_delay(&self, config: &Config) -> Duration {
        match self {
            CycleOutcome::Offline | CycleOutcome::Published(_) => config.sample_interval,
            CycleOutcome::GasReadFailed
            | CycleOutcome::ClimateReadFailed
            | CycleOutcome::ClockUnavailable => config.failure_cooldown,
        }
    }
}

pub struct Node<G, H, L, C, P> {
    config: Config,
    gas: G,
    climate: H,
    link: L,
    clock: C,
    publisher: P,
}

impl<G, H, L, C, P> Node<G, H, L, C, P>
where
    G: GasSensor,
    H: ClimateSensor,
    L: Link,
    C: Clock,
    P: Publisher,
{
    pub fn new(config: Config, gas: G, climate: H, link: L, clock: C, publisher: P) -> Self {
        Self {
            config,
            gas,
            climate,
            link,
            clock,
            publisher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Waits for the uplink, synchronizes the clock and brings up the climate
    /// sensor. Each wait is bounded by its configured [`Retry`](crate::wait::Retry).
    pub async fn start(&mut self) -> Result<()> {
        info!("connecting to network");
        let mut attempts = self.config.connect_retry.start();
        while !self.link.is_connected().await {
            attempts
                .pause()
                .await
                .context("network did not come up")?;
        }
        info!(waited = ?attempts.elapsed(), "network connected");

        info!(server = %self.config.ntp_server, "waiting for time sync");
        let mut attempts = self.config.clock_sync_retry.start();
        loop {
            match self.clock.sync().await {
                Ok(()) if self.clock.local_now().is_some() => break,
                Ok(()) => debug!("time server answered with an untrusted time"),
                Err(err) => debug!(error = format!("{err:#}"), "time sync attempt failed"),
            }
            attempts
                .pause()
                .await
                .context("clock did not synchronize")?;
        }
        info!(waited = ?attempts.elapsed(), "time synchronized");

        self.climate
            .init()
            .await
            .context("failed to initialize climate sensor")?;

        Ok(())
    }

    /// One pass: guard, sample, classify, timestamp, publish.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        if !self.link.is_connected().await {
            debug!("network down, skipping cycle");
            return CycleOutcome::Offline;
        }

        let raw = match self.gas.read_raw().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = format!("{err:#}"), "gas sensor read failed");
                return CycleOutcome::GasReadFailed;
            }
        };
        let gas = estimate_gas(raw);
        let carbon_level = CarbonLevel::classify(gas.co2_density);

        let humidity = self.climate.read_humidity().await;
        let temperature_c = self.climate.read_temperature().await;
        let (humidity, temperature_c) = match (humidity, temperature_c) {
            (Ok(h), Ok(t)) if !h.is_nan() && !t.is_nan() => (h, t),
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = format!("{err:#}"), "DHT read failed");
                return CycleOutcome::ClimateReadFailed;
            }
            (Ok(h), Ok(t)) => {
                warn!(humidity = h, temperature = t, "DHT read failed");
                return CycleOutcome::ClimateReadFailed;
            }
        };
        let heat_index_c = heat_index_celsius(temperature_c, humidity);

        let Some(now) = self.clock.local_now() else {
            warn!("failed to obtain time");
            return CycleOutcome::ClockUnavailable;
        };

        let reading = Reading {
            sensor_id: self.config.sensor_id,
            barangay_id: self.config.barangay_id,
            co2_density: gas.co2_density,
            temperature_c,
            humidity,
            heat_index_c,
            carbon_level,
            minute_stamp: minute_stamp(&now),
        };
        debug!(raw, ppm = gas.ppm, ?reading, "sampled");

        let outcome = self.publisher.publish(&reading).await;
        match &outcome {
            PublishOutcome::Status(code) => {
                info!(code, success = outcome.is_success(), "HTTP response")
            }
            PublishOutcome::Failed(reason) => warn!(%reason, "HTTP request failed"),
        }

        CycleOutcome::Published(outcome)
    }

    /// Runs cycles until `shutdown` resolves. Shutdown is only observed between
    /// cycles, so an in-flight reading is always finished.
    pub async fn run<F: Future<Output = ()>>(&mut self, shutdown: F) {
        let mut shutdown = pin!(shutdown);

        loop {
            let outcome = self.run_cycle().await;
            let delay = outcome.next_delay(&self.config);

            tokio::select! {
                () = &mut shutdown => {
                    info!("shutting down");
                    return;
                }
                () = sleep(delay) => {}
            }
        }
    }
}
