//! Runtime diagnostics flag
//!
//! Sibling services watch a single file whose entire content is the
//! literal string "true" or "false": is the packet forwarder up?

use std::fs;
use std::path::Path;

use pf_error::{PktfwdError, Result};
use tracing::debug;

/// Record whether the forwarder is running. The file holds exactly "true"
/// or "false", no trailing newline.
pub fn write_diagnostics(path: &Path, is_running: bool) -> Result<()> {
    let flag = if is_running { "true" } else { "false" };
    debug!("Writing diagnostics {} to {}", flag, path.display());
    fs::write(path, flag).map_err(|source| PktfwdError::file_write(path, source))
}
