//! Core data types for the pad translator

use crate::hal::Duration;

/// Number of logical buttons on the pad
pub const BUTTON_COUNT: usize = 8;

/// Logical buttons, in shift register order
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Fire button
    A,
    B,
    /// Also the configuration modifier
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    /// All buttons in shift register order
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// Position in the shift register (and in every per-button table)
    pub const fn index(&self) -> usize {
        match self {
            Button::A => 0,
            Button::B => 1,
            Button::Select => 2,
            Button::Start => 3,
            Button::Up => 4,
            Button::Down => 5,
            Button::Left => 6,
            Button::Right => 7,
        }
    }

    /// Bit of this button in a raw [`ButtonMask`]
    pub const fn bit(&self) -> u8 {
        1 << self.index()
    }
}

/// Raw 8-bit sample as read from the shift register.
///
/// Active low: a cleared bit means the button is held. Only lives at the
/// sampling boundary; everything past it works on [`ButtonSet`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    /// Sample with nothing held
    pub const RELEASED: ButtonMask = ButtonMask(0xFF);

    /// Build the raw mask that a pad holding `buttons` would produce
    pub fn from_pressed(buttons: &[Button]) -> Self {
        let mut raw = 0xFF;
        for button in buttons {
            raw &= !button.bit();
        }
        ButtonMask(raw)
    }

    pub const fn raw(&self) -> u8 {
        self.0
    }

    pub const fn is_pressed(&self, button: Button) -> bool {
        self.0 & button.bit() == 0
    }

    /// Normalize into a per-button pressed set
    pub fn buttons(&self) -> ButtonSet {
        let mut set = ButtonSet::new();
        for button in Button::ALL {
            set.set(button, self.is_pressed(button));
        }
        set
    }
}

/// One boolean per logical button.
///
/// Used both for the buttons held in a sample and for the keys the host
/// currently believes are down.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSet {
    pressed: [bool; BUTTON_COUNT],
}

impl ButtonSet {
    pub const fn new() -> Self {
        Self {
            pressed: [false; BUTTON_COUNT],
        }
    }

    pub const fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.pressed[button.index()] = pressed;
    }

    /// Returns true if any button is marked pressed
    pub fn any(&self) -> bool {
        self.pressed.iter().any(|&p| p)
    }

    pub fn count(&self) -> usize {
        self.pressed.iter().filter(|&&p| p).count()
    }

    pub fn clear(&mut self) {
        self.pressed = [false; BUTTON_COUNT];
    }

    /// Iterate over the buttons marked pressed, in shift register order
    pub fn iter_pressed(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|b| self.is_pressed(*b))
    }
}

/// Output key assigned to a button
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Produces nothing on press or release
    Disabled,
    /// Single byte set 2 scancode
    Standard(u8),
    /// Scancode sent behind the 0xE0 prefix
    Extended(u8),
    /// Pause/Break: one fixed 8-byte make sequence, never released
    Pause,
}

impl Key {
    /// Returns true if this key needs the extended prefix
    pub const fn is_extended(&self) -> bool {
        matches!(self, Key::Extended(_))
    }
}

/// Selectable layouts
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Profile {
    /// Letter keys (M, Q, A, O, P)
    Traditional,
    /// Number row 1-5
    LeftNumeric,
    /// Number row 6-0
    RightNumeric,
    /// Arrows, Enter and F1 for emulator front ends
    Emulator,
}

impl Profile {
    pub const ALL: [Profile; 4] = [
        Profile::Traditional,
        Profile::LeftNumeric,
        Profile::RightNumeric,
        Profile::Emulator,
    ];

    pub const fn index(&self) -> u8 {
        match self {
            Profile::Traditional => 0,
            Profile::LeftNumeric => 1,
            Profile::RightNumeric => 2,
            Profile::Emulator => 3,
        }
    }

    pub const fn from_index(index: u8) -> Option<Profile> {
        match index {
            0 => Some(Profile::Traditional),
            1 => Some(Profile::LeftNumeric),
            2 => Some(Profile::RightNumeric),
            3 => Some(Profile::Emulator),
            _ => None,
        }
    }
}

/// User settings kept across power cycles
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Active layout
    pub profile: Profile,
    /// Exchange which physical input drives logical A and B
    pub swap_ab: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: Profile::Traditional,
            swap_ab: false,
        }
    }
}

/// Outer states of the controller state machine
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PadMode {
    /// Buttons map straight to keys
    Normal,
    /// Select is held; A/B and the directions change settings
    Config,
}

impl PadMode {
    pub const fn is_config(&self) -> bool {
        matches!(self, PadMode::Config)
    }
}

/// Settings change requested from configuration mode
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigChange {
    /// New A/B swap flag
    Swap(bool),
    /// New active layout
    Profile(Profile),
}

/// Translator configuration parameters
#[derive(Copy, Clone, Debug)]
pub struct PadConfig {
    /// Minimum spacing between two transmitted bytes
    pub send_interval: Duration,
    /// Blocking pause after a settings change
    pub debounce: Duration,
    /// Used when the stored settings cannot be read
    pub default_settings: Settings,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_micros(2_500),
            debounce: Duration::from_millis(300),
            default_settings: Settings::default(),
        }
    }
}

impl PadConfig {
    /// Create a new configuration with validation
    pub fn new(
        send_interval_us: u64,
        debounce_ms: u64,
        default_settings: Settings,
    ) -> Result<Self, &'static str> {
        if !(1_000..=100_000).contains(&send_interval_us) {
            return Err("Send interval must be between 1ms and 100ms");
        }
        if debounce_ms > 2_000 {
            return Err("Debounce must be <= 2000ms");
        }

        Ok(Self {
            send_interval: Duration::from_micros(send_interval_us),
            debounce: Duration::from_millis(debounce_ms),
            default_settings,
        })
    }

    /// Debounce delay in whole milliseconds, as taken by `DelayNs::delay_ms`.
    /// Saturates at `u32::MAX` for a hand-built config.
    pub fn debounce_ms(&self) -> u32 {
        u32::try_from(self.debounce.as_millis()).unwrap_or(u32::MAX)
    }
}
