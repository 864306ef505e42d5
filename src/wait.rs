//! The readiness wait loop and its retry policy.
//!
//! The defaults reproduce the classic entrypoint cadence: one probe per
//! second, forever, trusting the deployment platform (restart policies,
//! rollout deadlines) to bound total wait time. Every departure from that
//! baseline is opt-in: an exponential backoff multiplier, an attempt
//! bound, an overall deadline.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::info;

use crate::error::{Error, Result};
use crate::probe::ReadinessProbe;

/// When and for how long to keep retrying a failed readiness check.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay between attempts before any backoff growth.
    pub interval: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    /// 1.0 keeps the cadence fixed.
    pub backoff_multiplier: f64,
    /// Cap on the grown delay. Ignored while the cadence is fixed.
    pub max_interval: Duration,
    /// Give up after this many failed attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Give up once this much time has been spent waiting. `None` is no
    /// deadline.
    pub max_wait: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            backoff_multiplier: 1.0,
            max_interval: Duration::from_secs(30),
            max_attempts: None,
            max_wait: None,
        }
    }
}

impl RetryPolicy {
    /// Delay to use after the next failure, given the delay just slept.
    ///
    /// Multipliers at or below 1.0 (NaN included) keep the cadence fixed;
    /// anything that grows past `max_interval` saturates at the cap.
    pub fn next_delay(&self, current: Duration) -> Duration {
        if self.backoff_multiplier.is_nan() || self.backoff_multiplier <= 1.0 {
            return current;
        }
        let grown = current.as_secs_f64() * self.backoff_multiplier;
        if grown >= self.max_interval.as_secs_f64() {
            self.max_interval
        } else {
            Duration::from_secs_f64(grown)
        }
    }

    /// Whether a failed attempt exhausts this policy.
    pub fn exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        if let Some(max) = self.max_attempts {
            if attempts >= max {
                return true;
            }
        }
        if let Some(max) = self.max_wait {
            if elapsed >= max {
                return true;
            }
        }
        false
    }
}

/// Poll `probe` until it reports ready, sleeping between attempts.
///
/// Emits a progress line before the first attempt and after every failed
/// one; returns the number of attempts it took. Unavailability only
/// becomes an error once the policy's attempt bound or deadline (if any)
/// is exhausted.
pub async fn wait_for_ready(probe: &dyn ReadinessProbe, policy: &RetryPolicy) -> Result<u32> {
    let started = Instant::now();
    let mut delay = policy.interval;
    let mut attempts: u32 = 0;

    info!(endpoint = %probe.describe(), "Waiting for PostgreSQL to accept connections");

    loop {
        attempts += 1;
        match probe.check().await {
            Ok(()) => {
                info!(
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "PostgreSQL is available"
                );
                return Ok(attempts);
            }
            Err(err) => {
                let elapsed = started.elapsed();
                if policy.exhausted(attempts, elapsed) {
                    return Err(Error::Unavailable { attempts, elapsed });
                }

                info!(
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "PostgreSQL is unavailable - retrying"
                );
                time::sleep(delay).await;
                delay = policy.next_delay(delay);
            }
        }
    }
}
