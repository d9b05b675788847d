//! Region to template-filename resolution
//!
//! Each LoRaWAN region ships a pre-built configuration template. The table
//! is fixed at build time; a region missing from it is a deployment defect
//! and aborts startup immediately.

use std::collections::HashMap;

use lazy_static::lazy_static;
use pf_error::{PktfwdError, Result};

lazy_static! {
    /// Region identifier -> regional template filename.
    ///
    /// The same filenames exist in both the SX1301 and SX1302 template
    /// directories; only the directory differs per chip family.
    pub static ref REGION_CONFIG_FILENAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("AS923_1", "AS923-1-global_conf.json");
        m.insert("AS923_2", "AS923-2-global_conf.json");
        m.insert("AS923_3", "AS923-3-global_conf.json");
        m.insert("AS923_4", "AS923-4-global_conf.json");
        m.insert("AU915", "AU-global_conf.json");
        m.insert("CN470", "CN-global_conf.json");
        m.insert("EU433", "EU433-global_conf.json");
        m.insert("EU868", "EU-global_conf.json");
        m.insert("IN865", "IN-global_conf.json");
        m.insert("KR920", "KR-global_conf.json");
        m.insert("RU864", "RU-global_conf.json");
        m.insert("US915", "US-global_conf.json");
        m
    };
}

/// Return the template filename for `region`, or `UnknownRegion` if the
/// region is not in the table.
pub fn region_config_filename(region: &str) -> Result<&'static str> {
    REGION_CONFIG_FILENAMES
        .get(region)
        .copied()
        .ok_or_else(|| PktfwdError::UnknownRegion(region.to_string()))
}
