//! Supervised forwarder launch
//!
//! One attempt = reset the concentrator, then exec the forwarder. The
//! retry policy wraps the whole attempt, so a failed launch gets a fresh
//! chip reset before the next try. Config materialization is NOT part of
//! the attempt - it happens once, before the first reset.

use pf_error::Result;
use tracing::{debug, info};

use crate::driver::ConcentratorDriver;
use crate::retry::RetryPolicy;

/// Reset and launch the forwarder under `policy`.
///
/// Blocks for the lifetime of the forwarder child. Returns an error only
/// once the policy's attempt budget is exhausted; that error is fatal to
/// startup and must reach the caller.
pub fn start_concentrator(driver: &dyn ConcentratorDriver, policy: &RetryPolicy) -> Result<()> {
    info!("Starting {} packet forwarder", driver.concentrator());
    policy.run("lora_pkt_fwd launch", |attempt| {
        debug!("Reset and launch attempt {}", attempt);
        driver.reset()?;
        driver.launch()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::Concentrator;
    use pf_error::PktfwdError;
    use std::cell::Cell;
    use std::io;
    use std::time::Duration;

    /// Driver whose launch fails a scripted number of times before
    /// succeeding. Resets always succeed and are counted.
    struct ScriptedDriver {
        resets: Cell<u32>,
        launches: Cell<u32>,
        launch_failures: u32,
    }

    impl ScriptedDriver {
        fn failing_first(launch_failures: u32) -> Self {
            Self {
                resets: Cell::new(0),
                launches: Cell::new(0),
                launch_failures,
            }
        }
    }

    impl ConcentratorDriver for ScriptedDriver {
        fn concentrator(&self) -> Concentrator {
            Concentrator::Sx1302
        }

        fn materialize_global_conf(&self) -> Result<()> {
            Ok(())
        }

        fn reset(&self) -> Result<()> {
            self.resets.set(self.resets.get() + 1);
            Ok(())
        }

        fn launch(&self) -> Result<()> {
            self.launches.set(self.launches.get() + 1);
            if self.launches.get() <= self.launch_failures {
                Err(PktfwdError::Spawn {
                    program: "/opt/lora_pkt_fwd".into(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                })
            } else {
                Ok(())
            }
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn reset_runs_exactly_once_per_attempt() {
        let driver = ScriptedDriver::failing_first(0);
        start_concentrator(&driver, &fast_policy()).unwrap();
        assert_eq!(driver.resets.get(), 1);
        assert_eq!(driver.launches.get(), 1);
    }

    #[test]
    fn success_on_third_attempt_resets_three_times() {
        let driver = ScriptedDriver::failing_first(2);
        start_concentrator(&driver, &fast_policy()).unwrap();
        assert_eq!(driver.resets.get(), 3);
        assert_eq!(driver.launches.get(), 3);
    }

    #[test]
    fn exhaustion_after_max_attempts_is_fatal() {
        let driver = ScriptedDriver::failing_first(u32::MAX);
        let err = start_concentrator(&driver, &fast_policy()).unwrap_err();
        assert_eq!(driver.resets.get(), 5);
        assert_eq!(driver.launches.get(), 5);
        assert!(matches!(
            err,
            PktfwdError::RetriesExhausted { attempts: 5, .. }
        ));
    }

    #[test]
    fn reset_spawn_failure_also_consumes_the_attempt() {
        /// Driver whose reset always fails to spawn
        struct BrokenReset {
            resets: Cell<u32>,
        }

        impl ConcentratorDriver for BrokenReset {
            fn concentrator(&self) -> Concentrator {
                Concentrator::Sx1301
            }
            fn materialize_global_conf(&self) -> Result<()> {
                Ok(())
            }
            fn reset(&self) -> Result<()> {
                self.resets.set(self.resets.get() + 1);
                Err(PktfwdError::Spawn {
                    program: "/opt/reset_lgw.sh".into(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                })
            }
            fn launch(&self) -> Result<()> {
                panic!("launch must not run when reset fails");
            }
        }

        let driver = BrokenReset {
            resets: Cell::new(0),
        };
        let err = start_concentrator(&driver, &fast_policy()).unwrap_err();
        assert_eq!(driver.resets.get(), 5);
        assert!(matches!(err, PktfwdError::RetriesExhausted { .. }));
    }
}
