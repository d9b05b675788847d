//! Concentrator chip family detection
//!
//! Two concentrator families are in the field: legacy SX1301 boards and the
//! newer SX1302 line. They need different configuration layouts, reset
//! scripts, and forwarder binaries, so the family is determined once at
//! startup and threaded through everything that follows.

use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Concentrator chip family fitted to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concentrator {
    Sx1301,
    Sx1302,
}

impl std::fmt::Display for Concentrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concentrator::Sx1301 => write!(f, "SX1301"),
            Concentrator::Sx1302 => write!(f, "SX1302"),
        }
    }
}

/// Probe the SPI bus with the sx1302_hal chip_id utility.
///
/// Returns true iff the utility exits with status 0. A non-zero exit and a
/// failure to launch the utility both count as "not an SX1302"; detection
/// never fails. chip_id pulses the concentrator reset line while probing,
/// so the chip comes back freshly reset.
pub fn is_concentrator_sx1302(util_chip_id: &Path, spi_bus: &str) -> bool {
    let device = format!("/dev/{}", spi_bus);
    debug!("Probing {} with {}", device, util_chip_id.display());

    match Command::new(util_chip_id).arg("-d").arg(&device).output() {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            debug!("chip_id exited with {}: not an SX1302", output.status);
            false
        }
        Err(err) => {
            debug!("chip_id could not run ({}): assuming SX1301", err);
            false
        }
    }
}

/// Detect the fitted concentrator family.
pub fn detect_concentrator(util_chip_id: &Path, spi_bus: &str) -> Concentrator {
    if is_concentrator_sx1302(util_chip_id, spi_bus) {
        Concentrator::Sx1302
    } else {
        Concentrator::Sx1301
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn exit_zero_classifies_as_sx1302() {
        let dir = tempfile::tempdir().unwrap();
        let chip_id = write_script(dir.path(), "chip_id", "#!/bin/sh\nexit 0\n");
        assert!(is_concentrator_sx1302(&chip_id, "spidev1.2"));
        assert_eq!(
            detect_concentrator(&chip_id, "spidev1.2"),
            Concentrator::Sx1302
        );
    }

    #[test]
    fn nonzero_exit_classifies_as_sx1301() {
        let dir = tempfile::tempdir().unwrap();
        let chip_id = write_script(dir.path(), "chip_id", "#!/bin/sh\nexit 3\n");
        assert!(!is_concentrator_sx1302(&chip_id, "spidev1.2"));
        assert_eq!(
            detect_concentrator(&chip_id, "spidev1.2"),
            Concentrator::Sx1301
        );
    }

    #[test]
    fn missing_utility_classifies_as_sx1301() {
        let chip_id = Path::new("/nonexistent/chip_id");
        assert!(!is_concentrator_sx1302(chip_id, "spidev1.2"));
        assert_eq!(detect_concentrator(chip_id, "spidev1.2"), Concentrator::Sx1301);
    }

    #[test]
    fn probe_targets_the_dev_node_for_the_bus() {
        let dir = tempfile::tempdir().unwrap();
        let argv_log = dir.path().join("argv");
        let chip_id = write_script(
            dir.path(),
            "chip_id",
            &format!("#!/bin/sh\necho \"$@\" > {}\nexit 0\n", argv_log.display()),
        );
        assert!(is_concentrator_sx1302(&chip_id, "spidev0.0"));
        let argv = fs::read_to_string(&argv_log).unwrap();
        assert_eq!(argv.trim(), "-d /dev/spidev0.0");
    }
}
