pub mod sntp;

use std::future::Future;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Datelike, TimeDelta, Utc};
use chrono_tz::Tz;
use tracing::info;

/// Local time is only trusted once it lands after this year; an unsynced RTC
/// usually sits near its epoch.
pub const EARLIEST_TRUSTED_YEAR: i32 = 2017;

/// Wall clock disciplined by a time server.
pub trait Clock {
    /// One synchronization attempt.
    fn sync(&mut self) -> impl Future<Output = Result<()>>;

    /// Current local time, or `None` if the clock cannot be trusted.
    fn local_now(&self) -> Option<DateTime<Tz>>;
}

/// System clock corrected by the offset measured against an SNTP server.
#[derive(Debug, Clone)]
pub struct NetworkClock {
    server: String,
    timezone: Tz,
    offset: Option<TimeDelta>,
}

impl NetworkClock {
    pub fn new(server: impl Into<String>, timezone: Tz) -> Self {
        Self {
            server: server.into(),
            timezone,
            offset: None,
        }
    }

    pub fn offset(&self) -> Option<TimeDelta> {
        self.offset
    }

    fn adjust(&self, system_now: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let now = system_now.checked_add_signed(self.offset?)?;
        trusted(now.with_timezone(&self.timezone))
    }
}

impl Clock for NetworkClock {
    async fn sync(&mut self) -> Result<()> {
        let server_now = sntp::query(&self.server)
            .await
            .with_context(|| format!("failed to query {}", self.server))?;
        let offset = server_now - Utc::now();

        info!(server = %self.server, offset_ms = offset.num_milliseconds(), "clock synchronized");
        self.offset = Some(offset);

        Ok(())
    }

    fn local_now(&self) -> Option<DateTime<Tz>> {
        self.adjust(Utc::now())
    }
}

/// Rejects times before [`EARLIEST_TRUSTED_YEAR`].
pub fn trusted(at: DateTime<Tz>) -> Option<DateTime<Tz>> {
    (at.year() >= EARLIEST_TRUSTED_YEAR).then_some(at)
}
