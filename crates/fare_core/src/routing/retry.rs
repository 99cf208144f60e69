use std::time::Duration;

use h3o::LatLng;
use rand::Rng;

use super::{RouteError, RouteProvider, RouteResult};

/// Bounded exponential backoff for transient routing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. 0 is treated as 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
    /// Random spread applied to each delay, as a fraction (0.2 = ±20%).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(4),
            multiplier: 2.0,
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    /// No retries: a single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based), before jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry as i32);
        let secs = self.initial_backoff.as_secs_f64() * factor;
        if !secs.is_finite() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs).min(self.max_backoff)
    }

    fn jittered_delay<R: Rng>(&self, retry: u32, rng: &mut R) -> Duration {
        let base = self.base_delay(retry);
        if self.jitter <= 0.0 || base.is_zero() {
            return base;
        }
        let spread = self.jitter.min(1.0);
        let factor = 1.0 + rng.gen_range(-spread..=spread);
        Duration::from_secs_f64((base.as_secs_f64() * factor).max(0.0))
    }
}

/// Retries transient failures of the inner provider; permanent errors return at once.
pub struct RetryingRouteProvider {
    inner: Box<dyn RouteProvider>,
    policy: RetryPolicy,
}

impl RetryingRouteProvider {
    pub fn new(inner: Box<dyn RouteProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl RouteProvider for RetryingRouteProvider {
    fn route(&self, origin: LatLng, destination: LatLng) -> Result<RouteResult, RouteError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut rng = rand::thread_rng();
        let mut retry = 0;

        loop {
            match self.inner.route(origin, destination) {
                Ok(route) => return Ok(route),
                Err(error) if error.is_transient() && retry + 1 < attempts => {
                    let delay = self.policy.jittered_delay(retry, &mut rng);
                    tracing::warn!(
                        %error,
                        attempt = retry + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "route request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    retry += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
