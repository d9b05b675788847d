//! Effective global_conf.json materialization
//!
//! The forwarder reads its whole configuration from a single
//! global_conf.json at launch. SX1301 builds take the regional template
//! verbatim; SX1302 builds need the SPI device path injected into the
//! template before it is written. Materialization runs exactly once, before
//! the first launch attempt, and its failures are deployment defects - they
//! are never retried.

use std::fs;
use std::path::Path;

use pf_error::{PktfwdError, Result};
use serde_json::Value;
use tracing::debug;

use crate::constants::GLOBAL_CONF_FILENAME;
use crate::region::region_config_filename;

/// Key of the radio sub-object in sx1302_hal configuration files
const SX130X_CONF_KEY: &str = "SX130x_conf";

/// Field within SX130x_conf naming the SPI device the HAL opens
const COM_DIR_KEY: &str = "com_dir";

/// Copy the regional template verbatim to `<root_dir>/global_conf.json`.
pub fn replace_sx1301_global_conf_with_regional(
    root_dir: &Path,
    sx1301_region_configs_dir: &Path,
    region: &str,
) -> Result<()> {
    let region_conf = sx1301_region_configs_dir.join(region_config_filename(region)?);
    let global_conf = root_dir.join(GLOBAL_CONF_FILENAME);
    debug!(
        "Copying SX1301 conf from {} to {}",
        region_conf.display(),
        global_conf.display()
    );

    let template = fs::read(&region_conf)
        .map_err(|source| PktfwdError::file_read(&region_conf, source))?;
    fs::write(&global_conf, template)
        .map_err(|source| PktfwdError::file_write(&global_conf, source))?;
    Ok(())
}

/// Load the regional template, inject the SPI device path, and write the
/// result to `<sx1302_region_configs_dir>/global_conf.json`.
///
/// Only `SX130x_conf.com_dir` is touched; every other field passes through
/// unchanged.
pub fn replace_sx1302_global_conf_with_regional(
    sx1302_region_configs_dir: &Path,
    region: &str,
    spi_bus: &str,
) -> Result<()> {
    let region_conf = sx1302_region_configs_dir.join(region_config_filename(region)?);
    let global_conf = sx1302_region_configs_dir.join(GLOBAL_CONF_FILENAME);

    let template = fs::read_to_string(&region_conf)
        .map_err(|source| PktfwdError::file_read(&region_conf, source))?;
    let mut conf: Value =
        serde_json::from_str(&template).map_err(|source| PktfwdError::TemplateParse {
            path: region_conf.clone(),
            source,
        })?;

    let radio = conf
        .get_mut(SX130X_CONF_KEY)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| PktfwdError::MalformedTemplate {
            path: region_conf.clone(),
            reason: format!("{} is missing or not an object", SX130X_CONF_KEY),
        })?;
    radio.insert(
        COM_DIR_KEY.to_string(),
        Value::String(format!("/dev/{}", spi_bus)),
    );

    debug!(
        "Writing SX1302 conf for {} to {}",
        region,
        global_conf.display()
    );
    let serialized = serde_json::to_string(&conf)?;
    fs::write(&global_conf, serialized)
        .map_err(|source| PktfwdError::file_write(&global_conf, source))?;
    Ok(())
}
