//! Runtime settings from the container environment
//!
//! The gateway ships as a balena container; every knob is an environment
//! variable with a shipped default. Read once at startup into an immutable
//! snapshot that the rest of the supervisor borrows from.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pf_error::{PktfwdError, Result};

use crate::constants::{defaults, env as env_vars};

/// Immutable snapshot of the supervisor's environment
#[derive(Debug, Clone)]
pub struct Settings {
    /// LoRaWAN region identifier, e.g. "US915"
    pub region: String,
    /// SPI bus the concentrator hangs off, without the /dev/ prefix
    pub spi_bus: String,
    /// GPIO pin wired to the concentrator reset line
    pub reset_lgw_pin: u32,
    /// Directory the SX1301 forwarder runs out of
    pub root_dir: PathBuf,
    pub sx1301_region_configs_dir: PathBuf,
    pub sx1302_region_configs_dir: PathBuf,
    pub sx1301_lora_pkt_fwd_dir: PathBuf,
    pub sx1302_lora_pkt_fwd_filepath: PathBuf,
    pub sx1301_reset_lgw_filepath: PathBuf,
    pub sx1302_reset_lgw_filepath: PathBuf,
    pub util_chip_id_filepath: PathBuf,
    /// File sibling services watch for the forwarder's running state
    pub diagnostics_filepath: PathBuf,
    /// Settle period before any hardware is touched
    pub await_system_sleep: Duration,
    /// Crash reporting DSN; reporting is disabled when absent
    pub sentry_dsn: Option<String>,
    pub balena_device_uuid: Option<String>,
    pub balena_app_name: Option<String>,
}

impl Settings {
    /// Read every knob from the environment.
    ///
    /// The region comes from `REGION_OVERRIDE` when set, `REGION`
    /// otherwise; having neither is a fatal configuration error. All other
    /// variables fall back to the shipped defaults.
    pub fn from_env() -> Result<Self> {
        let region = var(env_vars::REGION_OVERRIDE)
            .or_else(|| var(env_vars::REGION))
            .ok_or_else(|| PktfwdError::MissingConfig(env_vars::REGION.to_string()))?;

        let await_seconds: u64 = parse_var(
            env_vars::AWAIT_SYSTEM_SLEEP_SECONDS,
            defaults::AWAIT_SYSTEM_SLEEP_SECONDS,
        )?;

        Ok(Self {
            region,
            spi_bus: var_or(env_vars::SPI_BUS, defaults::SPI_BUS),
            reset_lgw_pin: parse_var(env_vars::RESET_LGW_PIN, defaults::RESET_LGW_PIN)?,
            root_dir: path_or(env_vars::ROOT_DIR, defaults::ROOT_DIR),
            sx1301_region_configs_dir: path_or(
                env_vars::SX1301_REGION_CONFIGS_DIR,
                defaults::SX1301_REGION_CONFIGS_DIR,
            ),
            sx1302_region_configs_dir: path_or(
                env_vars::SX1302_REGION_CONFIGS_DIR,
                defaults::SX1302_REGION_CONFIGS_DIR,
            ),
            sx1301_lora_pkt_fwd_dir: path_or(
                env_vars::SX1301_LORA_PKT_FWD_DIR,
                defaults::SX1301_LORA_PKT_FWD_DIR,
            ),
            sx1302_lora_pkt_fwd_filepath: path_or(
                env_vars::SX1302_LORA_PKT_FWD_FILEPATH,
                defaults::SX1302_LORA_PKT_FWD_FILEPATH,
            ),
            sx1301_reset_lgw_filepath: path_or(
                env_vars::SX1301_RESET_LGW_FILEPATH,
                defaults::SX1301_RESET_LGW_FILEPATH,
            ),
            sx1302_reset_lgw_filepath: path_or(
                env_vars::SX1302_RESET_LGW_FILEPATH,
                defaults::SX1302_RESET_LGW_FILEPATH,
            ),
            util_chip_id_filepath: path_or(
                env_vars::UTIL_CHIP_ID_FILEPATH,
                defaults::UTIL_CHIP_ID_FILEPATH,
            ),
            diagnostics_filepath: path_or(
                env_vars::DIAGNOSTICS_FILEPATH,
                defaults::DIAGNOSTICS_FILEPATH,
            ),
            await_system_sleep: Duration::from_secs(await_seconds),
            sentry_dsn: var(env_vars::SENTRY_PKTFWD),
            balena_device_uuid: var(env_vars::BALENA_DEVICE_UUID),
            balena_app_name: var(env_vars::BALENA_APP_NAME),
        })
    }
}

/// Environment lookup treating empty values as unset. Balena materializes
/// undefined service variables as empty strings.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

fn path_or(key: &str, default: &str) -> PathBuf {
    PathBuf::from(var_or(key, default))
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|err| {
            PktfwdError::invalid_config(key, format!("cannot parse {:?}: {}", raw, err))
        }),
    }
}
