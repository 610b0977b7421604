// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for idempotent Kubernetes reads.
//!
//! Transient API errors (429, 5xx) are retried with exponential backoff and
//! jitter; permanent errors (4xx client errors) fail fast. Only get-style
//! operations go through this path — status writes are never retried, so an
//! optimistic-concurrency conflict always surfaces to the caller.

use rand::Rng;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Maximum total time to spend retrying (30 seconds)
const MAX_ELAPSED_TIME_SECS: u64 = 30;

/// Initial retry interval (100ms)
const INITIAL_INTERVAL_MILLIS: u64 = 100;

/// Maximum interval between retries (5 seconds)
const MAX_INTERVAL_SECS: u64 = 5;

/// Backoff multiplier (exponential growth factor)
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
const RANDOMIZATION_FACTOR: f64 = 0.1;

/// Simple exponential backoff with randomization (jitter).
pub struct ExponentialBackoff {
    current_interval: Duration,
    max_interval: Duration,
    max_elapsed_time: Duration,
    multiplier: f64,
    randomization_factor: f64,
    start_time: Instant,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            current_interval: Duration::from_millis(INITIAL_INTERVAL_MILLIS),
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
            max_elapsed_time: Duration::from_secs(MAX_ELAPSED_TIME_SECS),
            multiplier: BACKOFF_MULTIPLIER,
            randomization_factor: RANDOMIZATION_FACTOR,
            start_time: Instant::now(),
        }
    }
}

impl ExponentialBackoff {
    /// Get the next backoff interval, or None if max elapsed time exceeded.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.start_time.elapsed() >= self.max_elapsed_time {
            return None;
        }

        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(jittered)
    }

    fn apply_jitter(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let delta = secs * self.randomization_factor;

        let mut rng = rand::thread_rng();
        let jittered = rng.gen_range((secs - delta)..=(secs + delta));

        Duration::from_secs_f64(jittered.max(0.0))
    }
}

/// Whether a Kubernetes API error is worth retrying.
///
/// Rate limiting (429) and server-side errors (5xx) are transient; every
/// other failure is treated as permanent.
#[must_use]
pub fn is_transient(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(response) => response.code == 429 || response.code >= 500,
        _ => false,
    }
}

/// Run an idempotent Kubernetes read, retrying transient errors.
///
/// # Errors
///
/// Returns the last error once a permanent error occurs or the backoff
/// budget is exhausted.
pub async fn retry_read<T, Fut, F>(description: &str, mut operation: F) -> Result<T, kube::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, kube::Error>>,
{
    let mut backoff = ExponentialBackoff::default();

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) => match backoff.next_backoff() {
                Some(delay) => {
                    debug!(
                        operation = description,
                        error = %err,
                        delay_millis = delay.as_millis() as u64,
                        "transient API error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    warn!(
                        operation = description,
                        error = %err,
                        "retry budget exhausted"
                    );
                    return Err(err);
                }
            },
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
