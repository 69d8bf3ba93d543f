//! Persistent settings byte
//!
//! Layout of the stored byte: bits [1:0] profile index, bit 2 A/B swap,
//! bits [7:3] reserved and ignored on read.

use crate::hal::{HalError, SettingsStore};
use crate::types::{Profile, Settings};

const PROFILE_MASK: u8 = 0b0000_0011;
const SWAP_BIT: u8 = 0b0000_0100;

impl Settings {
    /// Pack into the stored byte. Reserved bits are written as zero.
    pub const fn encode(&self) -> u8 {
        let mut raw = self.profile.index() & PROFILE_MASK;
        if self.swap_ab {
            raw |= SWAP_BIT;
        }
        raw
    }

    /// Unpack a stored byte, ignoring the reserved bits
    pub const fn decode(raw: u8) -> Option<Settings> {
        match Profile::from_index(raw & PROFILE_MASK) {
            Some(profile) => Some(Settings {
                profile,
                swap_ab: raw & SWAP_BIT != 0,
            }),
            None => None,
        }
    }
}

/// Read settings from the store.
///
/// An unreadable or undecodable byte is replaced by `default` and the
/// default is written back immediately. Never fails.
pub fn load_settings<S: SettingsStore>(store: &mut S, default: Settings) -> Settings {
    let decoded = store.read_byte().ok().and_then(Settings::decode);
    match decoded {
        Some(settings) => {
            #[cfg(feature = "defmt")]
            defmt::info!("Settings loaded: {:?}", settings);
            settings
        }
        None => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Stored settings unusable, restoring defaults");
            if let Err(_e) = save_settings(store, &default) {
                #[cfg(feature = "defmt")]
                defmt::warn!("Settings rewrite failed: {:?}", _e);
            }
            default
        }
    }
}

/// Write settings to the store
pub fn save_settings<S: SettingsStore>(store: &mut S, settings: &Settings) -> Result<(), HalError> {
    store.write_byte(settings.encode())
}
