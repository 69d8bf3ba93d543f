//! Host-side harness for driving the translator with scripted input

use ps2pad_core::hal::mock::{ManualClock, MockDelay, MockPad, MockStore, MockWire};
use ps2pad_core::test_utils::pad_script::PadScript;
use ps2pad_core::{
    ButtonMask, CycleReport, Duration, Key, PadBridge, PadConfig, Settings, PAUSE_SEQUENCE,
};

#[cfg(test)]
mod sampler_tests;
#[cfg(test)]
mod wire_tests;
#[cfg(test)]
mod property_tests;

pub type MockBridge = PadBridge<MockPad, MockWire, MockStore, MockDelay, ManualClock>;

/// Upper bound on cycles spent emptying the queue
const SETTLE_LIMIT: usize = 1_000;

/// Bridge on mock hardware with a clock that moves one send interval per
/// cycle, so every cycle may put a byte on the wire.
pub struct Harness {
    bridge: MockBridge,
    interval: Duration,
}

impl Harness {
    /// Harness whose store already holds `settings`
    pub fn new(settings: Settings) -> Self {
        Self::with_store(MockStore::with_value(settings.encode()))
    }

    pub fn with_store(store: MockStore) -> Self {
        let config = PadConfig::default();
        Self {
            bridge: PadBridge::new(
                MockPad::new(),
                MockWire::new(),
                store,
                MockDelay::new(),
                ManualClock::new(),
                config,
            ),
            interval: config.send_interval,
        }
    }

    /// Feed one sample and run one cycle
    pub fn step(&mut self, mask: ButtonMask) -> CycleReport {
        self.bridge.input_mut().push(mask);
        self.tick()
    }

    /// Run one cycle with the pad unchanged
    pub fn tick(&mut self) -> CycleReport {
        self.bridge.clock().advance(self.interval);
        self.bridge.cycle()
    }

    /// Run cycles until the queue is empty
    pub fn settle(&mut self) {
        for _ in 0..SETTLE_LIMIT {
            if self.bridge.pending() == 0 {
                return;
            }
            self.tick();
        }
    }

    /// Feed every sample of `script`, then settle
    pub fn run(&mut self, script: &PadScript) {
        for mask in script.samples() {
            self.step(mask);
        }
        self.settle();
    }

    pub fn sent(&self) -> &[u8] {
        self.bridge.wire().sent()
    }

    /// Bytes sent so far, clearing the record
    pub fn take_sent(&mut self) -> Vec<u8> {
        let sent = self.sent().to_vec();
        self.bridge.wire_mut().clear();
        sent
    }

    pub fn bridge(&self) -> &MockBridge {
        &self.bridge
    }
}

/// One key event recovered from the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEvent {
    Make(Key),
    Break(Key),
}

/// Parse a device-to-host byte stream back into key events.
///
/// Returns `None` on a truncated or malformed stream.
pub fn decode_stream(bytes: &[u8]) -> Option<Vec<WireEvent>> {
    let mut events = Vec::new();
    let mut rest = bytes;
    while let Some(&first) = rest.first() {
        let (event, used) = match first {
            0xE1 => {
                if !rest.starts_with(&PAUSE_SEQUENCE) {
                    return None;
                }
                (WireEvent::Make(Key::Pause), PAUSE_SEQUENCE.len())
            }
            0xE0 => match rest.get(1..)? {
                [0xF0, code, ..] => (WireEvent::Break(Key::Extended(*code)), 3),
                [code, ..] => (WireEvent::Make(Key::Extended(*code)), 2),
                [] => return None,
            },
            0xF0 => (WireEvent::Break(Key::Standard(*rest.get(1)?)), 2),
            code => (WireEvent::Make(Key::Standard(code)), 1),
        };
        events.push(event);
        rest = &rest[used..];
    }
    Some(events)
}
