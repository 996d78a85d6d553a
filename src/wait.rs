//! Bounded waiting for startup preconditions.
//!
//! ```ignore
//! let mut attempts = retry.start();
//! while !link.is_connected().await {
//!     attempts.pause().await?;
//! }
//! ```

use std::time::Duration;

use anyhow::{Result, bail};
use tokio::time::{Instant, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    /// Pause between probes.
    pub interval: Duration,

    /// Total time allowed before giving up.
    pub timeout: Duration,
}

impl Retry {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn start(&self) -> Attempts {
        let started_at = Instant::now();
        Attempts {
            interval: self.interval,
            started_at,
            deadline: started_at + self.timeout,
            failures: 0,
        }
    }
}

#[derive(Debug)]
pub struct Attempts {
    interval: Duration,
    started_at: Instant,
    deadline: Instant,
    failures: u32,
}

impl Attempts {
    /// Number of failed probes recorded so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Records a failed probe and sleeps until the next one, or fails once the
    /// deadline has passed. The last pause is shortened to end at the deadline.
    pub async fn pause(&mut self) -> Result<()> {
        self.failures += 1;

        let now = Instant::now();
        if now >= self.deadline {
            bail!(
                "gave up after {} attempts in {:?}",
                self.failures,
                self.elapsed()
            );
        }

        sleep(self.interval.min(self.deadline - now)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_about(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(10),
            "expected about {expected:?}, got {actual:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_pausing_when_ready() {
        let retry = Retry::new(Duration::from_millis(500), Duration::from_secs(5));
        let attempts = retry.start();
        assert_eq!(attempts.failures(), 0);
        assert_eq!(attempts.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_at_the_deadline() {
        let retry = Retry::new(Duration::from_millis(500), Duration::from_secs(2));
        let mut attempts = retry.start();

        let mut pauses = 0;
        while attempts.pause().await.is_ok() {
            pauses += 1;
        }

        assert_eq!(pauses, 4);
        assert_eq!(attempts.failures(), 5);
        assert_about(attempts.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn last_pause_is_cut_short() {
        let retry = Retry::new(Duration::from_millis(500), Duration::from_millis(700));
        let mut attempts = retry.start();

        attempts.pause().await.unwrap();
        attempts.pause().await.unwrap();
        assert_about(attempts.elapsed(), Duration::from_millis(700));
        assert!(attempts.pause().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn probe_succeeding_midway_stops_retrying() {
        let retry = Retry::new(Duration::from_millis(500), Duration::from_secs(60));
        let mut attempts = retry.start();

        let mut probes = 0;
        loop {
            probes += 1;
            if probes == 3 {
                break;
            }
            attempts.pause().await.unwrap();
        }

        assert_eq!(attempts.failures(), 2);
        assert_about(attempts.elapsed(), Duration::from_secs(1));
    }
}
