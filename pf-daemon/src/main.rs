//! pktfwdd - LoRa packet-forwarder supervisor daemon
//!
//! Sequential startup: wait for the host to settle, detect the fitted
//! concentrator family, materialize the forwarder configuration, then reset
//! and launch lora_pkt_fwd under a bounded retry policy. Runs inside the
//! gateway container; every knob arrives as an environment variable.
//!
//! # Exit behavior
//! - Configuration defects (unknown region, malformed template, missing
//!   env) abort immediately with a non-zero exit.
//! - Launch failures are retried with fixed backoff; exhausting the budget
//!   also exits non-zero.
//! - While the forwarder runs, this process stays blocked in the child.

mod diagnostics;

use std::thread;
use std::time::Duration;

use anyhow::Context;
use pf_core::constants::{defaults, env as env_vars};
use pf_core::{detect_concentrator, driver_for, start_concentrator, RetryPolicy, Settings};
use tracing::{debug, error, info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    init_logging();
    info!("pktfwdd {} starting", VERSION);

    if let Err(err) = run() {
        error!("Startup failed: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("reading settings from environment")?;
    let _sentry_guard = init_sentry(&settings);

    await_system_ready(settings.await_system_sleep);

    let concentrator = detect_concentrator(&settings.util_chip_id_filepath, &settings.spi_bus);
    info!(
        "Detected {} concentrator on {}, region {}",
        concentrator, settings.spi_bus, settings.region
    );

    let driver = driver_for(concentrator, &settings);
    driver
        .materialize_global_conf()
        .context("materializing global_conf.json")?;

    let result = start_concentrator(driver.as_ref(), &RetryPolicy::default());

    // The forwarder child has returned by the time we get here, so the
    // flag records the outcome of the supervised launch.
    if let Err(err) = diagnostics::write_diagnostics(&settings.diagnostics_filepath, result.is_ok())
    {
        warn!("Could not write diagnostics file: {}", err);
    }

    result.context("starting packet forwarder")?;
    Ok(())
}

/// Log to the systemd journal when available, stdout otherwise. The filter
/// comes from PKTFWD_LOG (default "info").
fn init_logging() {
    let log_level =
        std::env::var(env_vars::PKTFWD_LOG).unwrap_or_else(|_| defaults::PKTFWD_LOG.to_string());

    if std::path::Path::new("/run/systemd/journal/socket").exists() {
        if let Ok(journald_layer) = tracing_journald::layer() {
            use tracing_subscriber::prelude::*;
            tracing_subscriber::registry()
                .with(journald_layer)
                .with(tracing_subscriber::EnvFilter::new(&log_level))
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .init();
}

/// Initialize crash reporting. No-op without a DSN. The fleet name becomes
/// the Sentry environment and the device UUID the reporting user, so fleet
/// dashboards group crashes per gateway.
fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            environment: settings.balena_app_name.clone().map(Into::into),
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: settings.balena_device_uuid.clone(),
            ..Default::default()
        }));
    });
    debug!("Sentry initialized");
    Some(guard)
}

/// Give the host a settle period before touching hardware. The SPI device
/// and GPIO exports are not reliably present right after boot.
fn await_system_ready(sleep: Duration) {
    debug!("Waiting {}s for system to be ready", sleep.as_secs());
    thread::sleep(sleep);
    debug!("System ready");
}
