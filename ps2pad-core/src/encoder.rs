//! Make/break byte sequences for keys

use heapless::spsc::Producer;
use crate::layout::Layout;
use crate::queue::enqueue_all;
use crate::types::{ButtonSet, Key};

/// Prefix for extended scancodes
pub const EXTENDED_PREFIX: u8 = 0xE0;
/// Prefix for break (release) codes
pub const BREAK_PREFIX: u8 = 0xF0;
/// Complete Pause/Break make sequence. There is no break sequence.
pub const PAUSE_SEQUENCE: [u8; 8] = [0xE1, 0x14, 0x77, 0xE1, 0xF0, 0x14, 0xF0, 0x77];

/// Up to eight wire bytes for one key event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ScanSequence {
    bytes: [u8; 8],
    len: u8,
}

impl ScanSequence {
    pub const EMPTY: ScanSequence = ScanSequence { bytes: [0; 8], len: 0 };

    const fn one(a: u8) -> Self {
        Self { bytes: [a, 0, 0, 0, 0, 0, 0, 0], len: 1 }
    }

    const fn two(a: u8, b: u8) -> Self {
        Self { bytes: [a, b, 0, 0, 0, 0, 0, 0], len: 2 }
    }

    const fn three(a: u8, b: u8, c: u8) -> Self {
        Self { bytes: [a, b, c, 0, 0, 0, 0, 0], len: 3 }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bytes sent when `key` goes down
pub const fn make_sequence(key: Key) -> ScanSequence {
    match key {
        Key::Disabled => ScanSequence::EMPTY,
        Key::Standard(code) => ScanSequence::one(code),
        Key::Extended(code) => ScanSequence::two(EXTENDED_PREFIX, code),
        Key::Pause => ScanSequence { bytes: PAUSE_SEQUENCE, len: 8 },
    }
}

/// Bytes sent when `key` goes up
pub const fn break_sequence(key: Key) -> ScanSequence {
    match key {
        Key::Disabled | Key::Pause => ScanSequence::EMPTY,
        Key::Standard(code) => ScanSequence::two(BREAK_PREFIX, code),
        Key::Extended(code) => ScanSequence::three(EXTENDED_PREFIX, BREAK_PREFIX, code),
    }
}

/// Queue the make sequence for `key`.
///
/// The sequence goes in whole or not at all. Returns the bytes queued.
pub fn encode_press<const N: usize>(key: Key, queue: &mut Producer<'_, u8, N>) -> usize {
    #[cfg(feature = "defmt")]
    defmt::debug!("make {:?}", key);
    enqueue_all(queue, make_sequence(key).as_slice())
}

/// Queue the break sequence for `key`. No-op for Pause and disabled keys.
pub fn encode_release<const N: usize>(key: Key, queue: &mut Producer<'_, u8, N>) -> usize {
    #[cfg(feature = "defmt")]
    defmt::debug!("break {:?}", key);
    enqueue_all(queue, break_sequence(key).as_slice())
}

/// Release every key marked down in `keys` using `layout`, clearing each
/// flag as it goes. Returns the bytes queued.
///
/// Used before the active layout changes, so `layout` must be the one the
/// keys were pressed under.
pub fn release_all<const N: usize>(
    layout: &Layout,
    keys: &mut ButtonSet,
    queue: &mut Producer<'_, u8, N>,
) -> usize {
    let mut bytes = 0;
    let held = *keys;
    for button in held.iter_pressed() {
        bytes += encode_release(layout.key(button), queue);
        keys.set(button, false);
    }
    bytes
}
