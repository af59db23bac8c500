//! Request pacing for the annotation service
//!
//! NCBI E-utilities allow at most 3 requests per second without an API key
//! and throttle offenders aggressively, so all fetch workers share a single
//! token bucket. Workers only ever acquire permits; the bucket itself is
//! owned by the pipeline. A uniform random jitter is added to each wait so
//! concurrent workers do not fall into lockstep.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Jitter, Quota, RateLimiter,
};
use serde::{Deserialize, Serialize};

/// Request pacing configuration
///
/// The defaults reproduce a polite one-request-per-second cadence with up
/// to one extra second of jitter, comfortably under the keyless NCBI limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained minimum interval between requests, in milliseconds
    pub min_interval_ms: u64,

    /// Number of requests that may be issued back to back before pacing
    /// kicks in
    pub burst_size: u32,

    /// Upper bound of the uniform random delay added to each wait, in
    /// milliseconds (0 disables jitter)
    pub jitter_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
            burst_size: 1,
            jitter_ms: 1000,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            min_interval_ms: std::env::var("SNPSIG_MIN_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.min_interval_ms),
            burst_size: std::env::var("SNPSIG_BURST_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.burst_size),
            jitter_ms: std::env::var("SNPSIG_JITTER_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.jitter_ms),
        }
    }

    /// Configuration for tests: effectively unthrottled, deterministic waits
    pub fn test_config() -> Self {
        Self {
            min_interval_ms: 1,
            burst_size: 1,
            jitter_ms: 0,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_interval_ms == 0 {
            return Err("Minimum request interval must be greater than 0".to_string());
        }

        if self.burst_size == 0 {
            return Err("Burst size must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Shared token bucket that paces outbound requests
///
/// One token is replenished every `min_interval_ms`; [`acquire`](Self::acquire)
/// waits until a token is available, plus the configured jitter.
pub struct RequestPacer {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    jitter: Duration,
}

impl RequestPacer {
    /// Create a pacer from configuration
    pub fn new(config: &RateLimitConfig) -> Result<Self, String> {
        config.validate()?;

        let burst = NonZeroU32::new(config.burst_size)
            .ok_or_else(|| "Burst size must be at least 1".to_string())?;
        let quota = Quota::with_period(Duration::from_millis(config.min_interval_ms))
            .ok_or_else(|| "Minimum request interval must be greater than 0".to_string())?
            .allow_burst(burst);

        Ok(Self {
            limiter: RateLimiter::direct(quota),
            jitter: Duration::from_millis(config.jitter_ms),
        })
    }

    /// Wait until the next request may be sent
    pub async fn acquire(&self) {
        if self.jitter.is_zero() {
            self.limiter.until_ready().await;
        } else {
            self.limiter
                .until_ready_with_jitter(Jitter::up_to(self.jitter))
                .await;
        }
    }
}
