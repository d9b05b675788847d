//! Core library for the LoRa packet-forwarder supervisor
//!
//! Everything between "the container started" and "lora_pkt_fwd is running"
//! lives here:
//!
//! - **Detection**: probe the SPI bus to tell SX1301 from SX1302 boards
//! - **Configuration**: materialize the effective global_conf.json from a
//!   regional template
//! - **Reset**: drive the concentrator reset line through reset_lgw.sh
//! - **Supervision**: launch the forwarder, retrying the reset+launch
//!   sequence with fixed backoff
//!
//! The `pktfwdd` binary wires these together in sequence: detect, then
//! materialize, then supervise.

pub mod chip;
pub mod conf;
pub mod constants;
pub mod driver;
pub mod region;
pub mod reset;
pub mod retry;
pub mod settings;
pub mod supervisor;

// Re-export primary types
pub use chip::{detect_concentrator, is_concentrator_sx1302, Concentrator};
pub use driver::{driver_for, ConcentratorDriver, Sx1301Driver, Sx1302Driver};
pub use region::region_config_filename;
pub use retry::RetryPolicy;
pub use settings::Settings;
pub use supervisor::start_concentrator;

// Re-export error types
pub use pf_error::{PktfwdError, Result};
