//! Concentrator reset via the reset_lgw.sh GPIO script

use std::path::Path;
use std::process::Command;

use pf_error::{PktfwdError, Result};
use tracing::debug;

/// Pulse the concentrator reset line: `<script> stop <pin>` then
/// `<script> start <pin>`, each waited on synchronously.
///
/// The script's exit codes are not inspected - a reset that silently fails
/// shows up as the next forwarder launch failing, which is what drives the
/// outer retry loop. A spawn failure (missing or non-executable script) is
/// an error and counts against the retry budget. Safe to repeat once per
/// attempt.
pub fn run_reset_lgw(script: &Path, pin: u32) -> Result<()> {
    // reset_lgw.sh expects the pin as a string argument
    let pin = pin.to_string();
    debug!("Executing {} with reset pin {}", script.display(), pin);

    for action in ["stop", "start"] {
        Command::new(script)
            .args([action, pin.as_str()])
            .status()
            .map_err(|source| PktfwdError::Spawn {
                program: script.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}
