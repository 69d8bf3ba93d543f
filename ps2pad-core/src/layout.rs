//! Button to key tables for the four profiles

use crate::types::{Button, Key, Profile, BUTTON_COUNT};

/// Scan code set 2 make codes used by the layouts
pub mod scancode {
    pub const A: u8 = 0x1C;
    pub const M: u8 = 0x3A;
    pub const O: u8 = 0x44;
    pub const P: u8 = 0x4D;
    pub const Q: u8 = 0x15;

    pub const DIGIT_0: u8 = 0x45;
    pub const DIGIT_1: u8 = 0x16;
    pub const DIGIT_2: u8 = 0x1E;
    pub const DIGIT_3: u8 = 0x26;
    pub const DIGIT_4: u8 = 0x25;
    pub const DIGIT_5: u8 = 0x2E;
    pub const DIGIT_6: u8 = 0x36;
    pub const DIGIT_7: u8 = 0x3D;
    pub const DIGIT_8: u8 = 0x3E;
    pub const DIGIT_9: u8 = 0x46;

    pub const ESCAPE: u8 = 0x76;
    pub const ENTER: u8 = 0x5A;
    pub const F1: u8 = 0x05;

    // Extended (0xE0 prefixed)
    pub const UP_ARROW: u8 = 0x75;
    pub const DOWN_ARROW: u8 = 0x72;
    pub const LEFT_ARROW: u8 = 0x6B;
    pub const RIGHT_ARROW: u8 = 0x74;
}

/// Keys for each button of one profile, indexed by [`Button::index`]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Layout {
    keys: [Key; BUTTON_COUNT],
}

impl Layout {
    pub const fn new(keys: [Key; BUTTON_COUNT]) -> Self {
        Self { keys }
    }

    pub const fn key(&self, button: Button) -> Key {
        self.keys[button.index()]
    }
}

use scancode::*;
use Key::{Extended, Pause, Standard};

// Order: A, B, Select, Start, Up, Down, Left, Right
const TRADITIONAL: Layout = Layout::new([
    Standard(M),
    Standard(Q),
    Standard(ESCAPE),
    Pause,
    Standard(Q),
    Standard(A),
    Standard(O),
    Standard(P),
]);

const LEFT_NUMERIC: Layout = Layout::new([
    Standard(DIGIT_5),
    Standard(DIGIT_4),
    Standard(ESCAPE),
    Pause,
    Standard(DIGIT_4),
    Standard(DIGIT_3),
    Standard(DIGIT_1),
    Standard(DIGIT_2),
]);

const RIGHT_NUMERIC: Layout = Layout::new([
    Standard(DIGIT_0),
    Standard(DIGIT_9),
    Standard(ESCAPE),
    Pause,
    Standard(DIGIT_9),
    Standard(DIGIT_8),
    Standard(DIGIT_6),
    Standard(DIGIT_7),
]);

const EMULATOR: Layout = Layout::new([
    Standard(DIGIT_2),
    Standard(DIGIT_3),
    Standard(F1),
    Standard(ENTER),
    Extended(UP_ARROW),
    Extended(DOWN_ARROW),
    Extended(LEFT_ARROW),
    Extended(RIGHT_ARROW),
]);

impl Profile {
    /// Key table for this profile
    pub fn layout(&self) -> &'static Layout {
        match self {
            Profile::Traditional => &TRADITIONAL,
            Profile::LeftNumeric => &LEFT_NUMERIC,
            Profile::RightNumeric => &RIGHT_NUMERIC,
            Profile::Emulator => &EMULATOR,
        }
    }
}
