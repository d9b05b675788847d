//! Generation-specific concentrator drivers
//!
//! The SX1301 and SX1302 families differ in config layout, reset script,
//! and forwarder binary. Those differences live behind one trait, so the
//! branch on chip family is taken exactly once - when the driver is built -
//! and never again.

use std::path::{Path, PathBuf};
use std::process::Command;

use pf_error::{PktfwdError, Result};
use tracing::debug;

use crate::chip::Concentrator;
use crate::conf;
use crate::reset::run_reset_lgw;
use crate::settings::Settings;

/// One concentrator family's view of configure / reset / launch
pub trait ConcentratorDriver {
    /// Family this driver drives
    fn concentrator(&self) -> Concentrator;

    /// Write the effective global_conf.json for this family. Runs once,
    /// before the first launch attempt.
    fn materialize_global_conf(&self) -> Result<()>;

    /// Pulse the concentrator reset line via the family's reset_lgw.sh.
    fn reset(&self) -> Result<()>;

    /// Run the family's lora_pkt_fwd binary and wait for it to return.
    fn launch(&self) -> Result<()>;
}

/// Build the driver for the detected family from runtime settings.
pub fn driver_for(concentrator: Concentrator, settings: &Settings) -> Box<dyn ConcentratorDriver> {
    match concentrator {
        Concentrator::Sx1301 => Box::new(Sx1301Driver::new(settings)),
        Concentrator::Sx1302 => Box::new(Sx1302Driver::new(settings)),
    }
}

/// Legacy SX1301 boards: verbatim regional conf in the forwarder's working
/// directory, one forwarder build per SPI bus.
pub struct Sx1301Driver {
    root_dir: PathBuf,
    region_configs_dir: PathBuf,
    lora_pkt_fwd_dir: PathBuf,
    reset_lgw_filepath: PathBuf,
    region: String,
    spi_bus: String,
    reset_lgw_pin: u32,
}

impl Sx1301Driver {
    pub fn new(settings: &Settings) -> Self {
        Self {
            root_dir: settings.root_dir.clone(),
            region_configs_dir: settings.sx1301_region_configs_dir.clone(),
            lora_pkt_fwd_dir: settings.sx1301_lora_pkt_fwd_dir.clone(),
            reset_lgw_filepath: settings.sx1301_reset_lgw_filepath.clone(),
            region: settings.region.clone(),
            spi_bus: settings.spi_bus.clone(),
            reset_lgw_pin: settings.reset_lgw_pin,
        }
    }
}

impl ConcentratorDriver for Sx1301Driver {
    fn concentrator(&self) -> Concentrator {
        Concentrator::Sx1301
    }

    fn materialize_global_conf(&self) -> Result<()> {
        conf::replace_sx1301_global_conf_with_regional(
            &self.root_dir,
            &self.region_configs_dir,
            &self.region,
        )
    }

    fn reset(&self) -> Result<()> {
        run_reset_lgw(&self.reset_lgw_filepath, self.reset_lgw_pin)
    }

    fn launch(&self) -> Result<()> {
        // Each SPI bus ships its own forwarder build
        let binary = self
            .lora_pkt_fwd_dir
            .join(format!("lora_pkt_fwd_{}", self.spi_bus));
        run_forwarder(&binary)
    }
}

/// SX1302 boards: regional conf with the SPI device injected, single
/// forwarder binary from sx1302_hal.
pub struct Sx1302Driver {
    region_configs_dir: PathBuf,
    lora_pkt_fwd_filepath: PathBuf,
    reset_lgw_filepath: PathBuf,
    region: String,
    spi_bus: String,
    reset_lgw_pin: u32,
}

impl Sx1302Driver {
    pub fn new(settings: &Settings) -> Self {
        Self {
            region_configs_dir: settings.sx1302_region_configs_dir.clone(),
            lora_pkt_fwd_filepath: settings.sx1302_lora_pkt_fwd_filepath.clone(),
            reset_lgw_filepath: settings.sx1302_reset_lgw_filepath.clone(),
            region: settings.region.clone(),
            spi_bus: settings.spi_bus.clone(),
            reset_lgw_pin: settings.reset_lgw_pin,
        }
    }
}

impl ConcentratorDriver for Sx1302Driver {
    fn concentrator(&self) -> Concentrator {
        Concentrator::Sx1302
    }

    fn materialize_global_conf(&self) -> Result<()> {
        conf::replace_sx1302_global_conf_with_regional(
            &self.region_configs_dir,
            &self.region,
            &self.spi_bus,
        )
    }

    fn reset(&self) -> Result<()> {
        run_reset_lgw(&self.reset_lgw_filepath, self.reset_lgw_pin)
    }

    fn launch(&self) -> Result<()> {
        run_forwarder(&self.lora_pkt_fwd_filepath)
    }
}

/// Run the forwarder and block until it returns.
///
/// The exit status is deliberately not inspected: the forwarder is a
/// long-running child, and only a failure to exec counts as a launch
/// failure at this layer.
fn run_forwarder(binary: &Path) -> Result<()> {
    debug!("Launching {}", binary.display());
    let status = Command::new(binary)
        .status()
        .map_err(|source| PktfwdError::Spawn {
            program: binary.to_path_buf(),
            source,
        })?;
    debug!("{} returned with {}", binary.display(), status);
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    fn write_script(path: &Path, body: &str) {
        fs::write(path, body).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            region: "US915".to_string(),
            spi_bus: "spidev1.2".to_string(),
            reset_lgw_pin: 17,
            root_dir: dir.join("root"),
            sx1301_region_configs_dir: dir.join("sx1301_configs"),
            sx1302_region_configs_dir: dir.join("sx1302_configs"),
            sx1301_lora_pkt_fwd_dir: dir.join("lora_pkt_fwd"),
            sx1302_lora_pkt_fwd_filepath: dir.join("sx1302_lora_pkt_fwd"),
            sx1301_reset_lgw_filepath: dir.join("sx1301_reset_lgw.sh"),
            sx1302_reset_lgw_filepath: dir.join("sx1302_reset_lgw.sh"),
            util_chip_id_filepath: dir.join("chip_id"),
            diagnostics_filepath: dir.join("diagnostics"),
            await_system_sleep: Duration::ZERO,
            sentry_dsn: None,
            balena_device_uuid: None,
            balena_app_name: None,
        }
    }

    #[test]
    fn driver_for_selects_by_family() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        assert_eq!(
            driver_for(Concentrator::Sx1301, &settings).concentrator(),
            Concentrator::Sx1301
        );
        assert_eq!(
            driver_for(Concentrator::Sx1302, &settings).concentrator(),
            Concentrator::Sx1302
        );
    }

    #[test]
    fn sx1301_launch_appends_the_bus_to_the_binary_name() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::create_dir_all(&settings.sx1301_lora_pkt_fwd_dir).unwrap();
        let argv_log = dir.path().join("argv");
        write_script(
            &settings.sx1301_lora_pkt_fwd_dir.join("lora_pkt_fwd_spidev1.2"),
            &format!("#!/bin/sh\necho launched >> {}\n", argv_log.display()),
        );

        let driver = Sx1301Driver::new(&settings);
        driver.launch().unwrap();
        assert_eq!(fs::read_to_string(&argv_log).unwrap(), "launched\n");
    }

    #[test]
    fn sx1302_launch_uses_the_fixed_binary_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let argv_log = dir.path().join("argv");
        write_script(
            &settings.sx1302_lora_pkt_fwd_filepath,
            &format!("#!/bin/sh\necho launched >> {}\n", argv_log.display()),
        );

        let driver = Sx1302Driver::new(&settings);
        driver.launch().unwrap();
        assert_eq!(fs::read_to_string(&argv_log).unwrap(), "launched\n");
    }

    #[test]
    fn missing_forwarder_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());

        let driver = Sx1302Driver::new(&settings);
        let err = driver.launch().unwrap_err();
        assert!(matches!(err, PktfwdError::Spawn { .. }));
    }

    #[test]
    fn forwarder_exit_status_is_not_inspected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        write_script(&settings.sx1302_lora_pkt_fwd_filepath, "#!/bin/sh\nexit 7\n");

        let driver = Sx1302Driver::new(&settings);
        assert!(driver.launch().is_ok());
    }
}
