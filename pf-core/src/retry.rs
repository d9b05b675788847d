//! Fixed-backoff retry policy
//!
//! A first-class retry construct: bounded attempts, fixed pause, a warning
//! per failed attempt. Wraps any fallible operation, so the policy is
//! testable apart from what it retries.

use std::thread;
use std::time::Duration;

use pf_error::{PktfwdError, Result};
use tracing::warn;

use crate::constants::retry::{LORA_PKT_FWD_MAX_TRIES, LORA_PKT_FWD_RETRY_SLEEP};

/// Retry an operation a bounded number of times with a fixed pause between
/// attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1)
    pub max_attempts: u32,
    /// Pause between consecutive failed attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: LORA_PKT_FWD_MAX_TRIES,
            backoff: LORA_PKT_FWD_RETRY_SLEEP,
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or `max_attempts` attempts have failed.
    ///
    /// `op` receives the 1-based attempt ordinal. Every failed attempt
    /// except the last is logged with its ordinal and followed by the
    /// backoff pause; there is no pause before the first attempt or after
    /// the last. The final attempt's error comes back wrapped in
    /// `RetriesExhausted`.
    pub fn run<T, F>(&self, what: &str, op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        self.run_with_sleep(what, op, thread::sleep)
    }

    fn run_with_sleep<T, F, S>(&self, what: &str, mut op: F, mut sleep: S) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
        S: FnMut(Duration),
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(source) if attempt >= self.max_attempts => {
                    return Err(PktfwdError::RetriesExhausted {
                        what: what.to_string(),
                        attempts: attempt,
                        source: Box::new(source),
                    });
                }
                Err(err) => {
                    warn!(
                        "{} failed on attempt {}/{}: {}",
                        what, attempt, self.max_attempts, err
                    );
                    sleep(self.backoff);
                    attempt += 1;
                }
            }
        }
    }
}
