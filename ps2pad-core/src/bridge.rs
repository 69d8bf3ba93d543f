//! PadBridge: one outer loop iteration from pad sample to wire byte

use embedded_hal::delay::DelayNs;
use heapless::spsc::Queue;
use crate::fsm::{PadFsm, Step};
use crate::hal::{Clock, KeyboardWire, PadInput, SettingsStore};
use crate::queue::OutputQueue;
use crate::settings::{load_settings, save_settings};
use crate::transmitter::Transmitter;
use crate::types::{PadConfig, Settings};

/// Outcome of one [`PadBridge::cycle`]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Byte written to the wire this cycle
    pub sent: Option<u8>,
    /// State machine result, `None` if sampling failed
    pub step: Option<Step>,
}

/// Owns the pad, the wire, the settings store and everything between them.
///
/// Runs the whole translator as one cooperative loop. Nothing here returns
/// an error to the caller: hardware failures are logged and the loop goes on.
pub struct PadBridge<I, W, S, D, C> {
    input: I,
    wire: W,
    store: S,
    delay: D,
    clock: C,
    config: PadConfig,
    fsm: PadFsm,
    transmitter: Transmitter,
    queue: OutputQueue,
}

impl<I, W, S, D, C> PadBridge<I, W, S, D, C>
where
    I: PadInput,
    W: KeyboardWire,
    S: SettingsStore,
    D: DelayNs,
    C: Clock,
{
    /// Create a bridge, loading (and if needed repairing) the stored settings
    pub fn new(input: I, wire: W, mut store: S, delay: D, clock: C, config: PadConfig) -> Self {
        let settings = load_settings(&mut store, config.default_settings);
        Self {
            input,
            wire,
            store,
            delay,
            clock,
            config,
            fsm: PadFsm::new(settings),
            transmitter: Transmitter::new(config.send_interval),
            queue: Queue::new(),
        }
    }

    /// Run forever
    pub fn run(&mut self) -> ! {
        loop {
            self.cycle();
        }
    }

    /// One outer loop iteration: drain one byte, sample, step the state
    /// machine, then persist and debounce on a settings change.
    pub fn cycle(&mut self) -> CycleReport {
        let (mut producer, mut consumer) = self.queue.split();

        let sent = match self.transmitter.drain(&mut consumer, &mut self.wire, &self.clock) {
            Ok(sent) => sent,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Wire write failed: {:?}", _e);
                None
            }
        };

        let mask = match self.input.sample() {
            Ok(mask) => mask,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Pad sample failed: {:?}", _e);
                return CycleReport { sent, step: None };
            }
        };

        let step = self.fsm.update(mask, &mut producer);

        if let Some(_change) = step.change {
            #[cfg(feature = "defmt")]
            defmt::info!("Settings change: {:?}", _change);
            if let Err(_e) = save_settings(&mut self.store, self.fsm.settings()) {
                #[cfg(feature = "defmt")]
                defmt::warn!("Settings save failed: {:?}", _e);
            }
            self.delay.delay_ms(self.config.debounce_ms());
        }

        CycleReport { sent, step: Some(step) }
    }

    /// Run cycles until the output queue is empty, at most `max_cycles`.
    /// Returns the number of cycles run.
    pub fn flush(&mut self, max_cycles: usize) -> usize {
        for cycles in 0..max_cycles {
            if self.pending() == 0 {
                return cycles;
            }
            self.cycle();
        }
        max_cycles
    }

    /// Bytes waiting to be sent
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn settings(&self) -> &Settings {
        self.fsm.settings()
    }

    pub fn fsm(&self) -> &PadFsm {
        &self.fsm
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn wire(&self) -> &W {
        &self.wire
    }

    pub fn wire_mut(&mut self) -> &mut W {
        &mut self.wire
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Decompose the bridge into its hardware parts
    pub fn into_parts(self) -> (I, W, S, D, C) {
        (self.input, self.wire, self.store, self.delay, self.clock)
    }
}
