//! Constants and configuration defaults for the supervisor
//!
//! Centralizes env-var names, shipped paths, and retry parameters.
//! Never use magic values in other files - add them here first.

use std::time::Duration;

/// Output filename every forwarder build reads its configuration from
pub const GLOBAL_CONF_FILENAME: &str = "global_conf.json";

/// Retry parameters for the supervised forwarder launch
pub mod retry {
    use super::Duration;

    /// Maximum reset+launch attempts before startup is declared failed
    pub const LORA_PKT_FWD_MAX_TRIES: u32 = 5;

    /// Fixed pause between consecutive failed attempts
    pub const LORA_PKT_FWD_RETRY_SLEEP: Duration = Duration::from_secs(2);
}

/// Environment variables understood by `Settings::from_env`
///
/// The gateway ships as a container; fleet-wide and per-device overrides
/// arrive through the service environment.
pub mod env {
    /// Region identifier, e.g. "US915" or "EU868"
    pub const REGION: &str = "REGION";

    /// Per-device region override; takes precedence over `REGION`
    pub const REGION_OVERRIDE: &str = "REGION_OVERRIDE";

    /// SPI bus the concentrator hangs off, without the /dev/ prefix
    pub const SPI_BUS: &str = "SPI_BUS";

    /// GPIO pin wired to the concentrator reset line
    pub const RESET_LGW_PIN: &str = "RESET_LGW_PIN";

    /// Directory the SX1301 forwarder runs out of
    pub const ROOT_DIR: &str = "ROOT_DIR";

    /// Regional template directories, one per chip family
    pub const SX1301_REGION_CONFIGS_DIR: &str = "SX1301_REGION_CONFIGS_DIR";
    pub const SX1302_REGION_CONFIGS_DIR: &str = "SX1302_REGION_CONFIGS_DIR";

    /// Directory holding the per-bus SX1301 forwarder builds
    pub const SX1301_LORA_PKT_FWD_DIR: &str = "SX1301_LORA_PKT_FWD_DIR";

    /// Full path of the single SX1302 forwarder binary
    pub const SX1302_LORA_PKT_FWD_FILEPATH: &str = "SX1302_LORA_PKT_FWD_FILEPATH";

    /// Reset scripts, one per chip family
    pub const SX1301_RESET_LGW_FILEPATH: &str = "SX1301_RESET_LGW_FILEPATH";
    pub const SX1302_RESET_LGW_FILEPATH: &str = "SX1302_RESET_LGW_FILEPATH";

    /// sx1302_hal chip_id utility used for family detection
    pub const UTIL_CHIP_ID_FILEPATH: &str = "UTIL_CHIP_ID_FILEPATH";

    /// File sibling services watch for the forwarder's running state
    pub const DIAGNOSTICS_FILEPATH: &str = "DIAGNOSTICS_FILEPATH";

    /// Seconds to wait for the host to settle before touching hardware
    pub const AWAIT_SYSTEM_SLEEP_SECONDS: &str = "AWAIT_SYSTEM_SLEEP_SECONDS";

    /// Sentry DSN; crash reporting is disabled when unset
    pub const SENTRY_PKTFWD: &str = "SENTRY_PKTFWD";

    /// Device and fleet identifiers injected by the container supervisor
    pub const BALENA_DEVICE_UUID: &str = "BALENA_DEVICE_UUID";
    pub const BALENA_APP_NAME: &str = "BALENA_APP_NAME";

    /// Log level filter (trace, debug, info, warn, error)
    pub const PKTFWD_LOG: &str = "PKTFWD_LOG";
}

/// Shipped defaults matching the gateway container image layout
pub mod defaults {
    pub const SPI_BUS: &str = "spidev1.2";

    pub const RESET_LGW_PIN: u32 = 17;

    pub const ROOT_DIR: &str = "/opt/iotloragateway/packet_forwarder";

    pub const SX1301_REGION_CONFIGS_DIR: &str =
        "/opt/iotloragateway/packet_forwarder/lora_templates_sx1301";

    pub const SX1302_REGION_CONFIGS_DIR: &str =
        "/opt/iotloragateway/packet_forwarder/lora_templates_sx1302";

    pub const SX1301_LORA_PKT_FWD_DIR: &str =
        "/opt/iotloragateway/packet_forwarder/lora_pkt_fwd";

    pub const SX1302_LORA_PKT_FWD_FILEPATH: &str =
        "/opt/iotloragateway/packet_forwarder/sx1302_hal/packet_forwarder/lora_pkt_fwd";

    pub const SX1301_RESET_LGW_FILEPATH: &str =
        "/opt/iotloragateway/packet_forwarder/reset_lgw.sh";

    pub const SX1302_RESET_LGW_FILEPATH: &str =
        "/opt/iotloragateway/packet_forwarder/sx1302_hal/tools/reset_lgw.sh";

    pub const UTIL_CHIP_ID_FILEPATH: &str =
        "/opt/iotloragateway/packet_forwarder/sx1302_hal/util_chip_id/chip_id";

    pub const DIAGNOSTICS_FILEPATH: &str = "/var/pktfwd/diagnostics";

    pub const AWAIT_SYSTEM_SLEEP_SECONDS: u64 = 5;

    pub const PKTFWD_LOG: &str = "info";
}
