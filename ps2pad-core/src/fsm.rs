//! Controller state machine: button edges to key events, and the
//! Select-held configuration menu

use heapless::spsc::Producer;
use crate::encoder::{encode_press, encode_release, release_all};
use crate::types::{Button, ButtonMask, ButtonSet, ConfigChange, PadMode, Profile, Settings};

/// Direction buttons that select a profile in configuration mode.
/// Checked in this order; the first fresh press wins.
const PROFILE_BUTTONS: [(Button, Profile); 4] = [
    (Button::Down, Profile::Traditional),
    (Button::Left, Profile::LeftNumeric),
    (Button::Right, Profile::RightNumeric),
    (Button::Up, Profile::Emulator),
];

/// Result of one state machine step
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Bytes enqueued during the step
    pub bytes: usize,
    /// Settings change made in configuration mode. When set, the caller
    /// must persist [`PadFsm::settings`] and apply the debounce delay.
    pub change: Option<ConfigChange>,
}

/// Main controller state machine
pub struct PadFsm {
    mode: PadMode,
    settings: Settings,
    /// Keys the host currently sees as down
    keys: ButtonSet,
    /// Buttons held in the previous sample
    previous: ButtonSet,
}

impl PadFsm {
    /// Create a new state machine with the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: PadMode::Normal,
            settings,
            keys: ButtonSet::new(),
            previous: ButtonSet::new(),
        }
    }

    pub fn mode(&self) -> PadMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Keys currently reported as down
    pub fn keys(&self) -> &ButtonSet {
        &self.keys
    }

    /// Process one pad sample and enqueue the resulting key events
    pub fn update<const N: usize>(&mut self, mask: ButtonMask, queue: &mut Producer<'_, u8, N>) -> Step {
        let current = mask.buttons();
        let select_now = current.is_pressed(Button::Select);
        let select_before = self.previous.is_pressed(Button::Select);
        let mut bytes = 0;

        if select_now && !select_before {
            bytes += release_all(self.settings.profile.layout(), &mut self.keys, queue);
            self.mode = PadMode::Config;
            #[cfg(feature = "defmt")]
            defmt::debug!("Entering configuration mode");
        } else if !select_now && select_before {
            self.mode = PadMode::Normal;
            #[cfg(feature = "defmt")]
            defmt::debug!("Leaving configuration mode");
        }

        if self.mode.is_config() {
            if let Some(change) = self.handle_config(&current, queue, &mut bytes) {
                self.previous = current;
                return Step { bytes, change: Some(change) };
            }
        }

        bytes += self.handle_normal(&current, queue);
        self.previous = current;
        Step { bytes, change: None }
    }

    /// Swap and profile selection. Returns the change made, if any.
    fn handle_config<const N: usize>(
        &mut self,
        current: &ButtonSet,
        queue: &mut Producer<'_, u8, N>,
        bytes: &mut usize,
    ) -> Option<ConfigChange> {
        let fresh = |button: Button| current.is_pressed(button) && !self.previous.is_pressed(button);

        if fresh(Button::A) {
            self.settings.swap_ab = false;
            return Some(ConfigChange::Swap(false));
        }
        if fresh(Button::B) {
            self.settings.swap_ab = true;
            return Some(ConfigChange::Swap(true));
        }

        let (_, profile) = PROFILE_BUTTONS.into_iter().find(|(button, _)| fresh(*button))?;
        *bytes += release_all(self.settings.profile.layout(), &mut self.keys, queue);
        // Start the new layout from a clean slate whatever release_all left
        self.keys.clear();
        self.settings.profile = profile;

        #[cfg(feature = "defmt")]
        defmt::info!("Profile {:?} selected", profile);

        Some(ConfigChange::Profile(profile))
    }

    /// Per-button edge detection against the reported key state
    fn handle_normal<const N: usize>(&mut self, current: &ButtonSet, queue: &mut Producer<'_, u8, N>) -> usize {
        let (logical_a, logical_b) = if self.settings.swap_ab {
            (current.is_pressed(Button::B), current.is_pressed(Button::A))
        } else {
            (current.is_pressed(Button::A), current.is_pressed(Button::B))
        };
        let layout = self.settings.profile.layout();
        let mut bytes = 0;

        for button in Button::ALL {
            let pressed = match button {
                Button::A => logical_a,
                Button::B => logical_b,
                other => current.is_pressed(other),
            };
            let down = self.keys.is_pressed(button);

            if pressed && !down {
                bytes += encode_press(layout.key(button), queue);
                self.keys.set(button, true);
            } else if !pressed && down {
                bytes += encode_release(layout.key(button), queue);
                self.keys.set(button, false);
            }
        }
        bytes
    }
}
