#![cfg_attr(not(feature = "std"), no_std)]

//! # PS/2 Pad Core
//!
//! Translates an 8-button shift-register game pad into a PS/2 keyboard.
//! Four selectable key layouts, optional A/B swap, settings persisted in a
//! single byte, paced byte-at-a-time transmission.

pub mod types;
pub mod layout;
pub mod settings;
pub mod encoder;
pub mod queue;
pub mod transmitter;
pub mod fsm;
pub mod controller;
pub mod bridge;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use layout::Layout;
pub use settings::{load_settings, save_settings};
pub use encoder::{encode_press, encode_release, release_all, ScanSequence, PAUSE_SEQUENCE};
pub use queue::{OutputQueue, QUEUE_SIZE};
pub use transmitter::Transmitter;
pub use fsm::*;
pub use controller::*;
pub use bridge::*;
pub use hal::{*, Instant, Duration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: 2.5 ms between bytes, 300 ms after a settings
/// change, Traditional layout without swap.
pub fn default_config() -> PadConfig {
    PadConfig::default()
}
