//! Hardware Abstraction Layer for the pad translator

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Microsecond instant for builds without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_micros(us: u64) -> Self {
            Self(us)
        }

        pub const fn from_millis(ms: u64) -> Self {
            Self(ms * 1_000)
        }

        pub fn duration_since(&self, other: Instant) -> Duration {
            Duration::from_micros(self.0.saturating_sub(other.0))
        }

        pub const fn as_micros(&self) -> u64 {
            self.0
        }

        pub const fn as_millis(&self) -> u64 {
            self.0 / 1_000
        }
    }

    /// Microsecond duration
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_micros(us: u64) -> Self {
            Self(us)
        }

        pub const fn from_millis(ms: u64) -> Self {
            Self(ms * 1_000)
        }

        pub const fn as_micros(&self) -> u64 {
            self.0
        }

        pub const fn as_millis(&self) -> u64 {
            self.0 / 1_000
        }
    }

    impl core::ops::Add<Duration> for Instant {
        type Output = Instant;

        fn add(self, rhs: Duration) -> Instant {
            Instant(self.0 + rhs.0)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use crate::types::ButtonMask;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Settings store could not be read or written
    StoreError,
    /// Host pulled the clock low while a frame was being sent
    Inhibited,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::StoreError => write!(f, "Settings store access failed"),
            HalError::Inhibited => write!(f, "Host inhibited transmission"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Source of raw pad samples
pub trait PadInput {
    /// Read all eight buttons. Blocks for the duration of one shift-out.
    fn sample(&mut self) -> Result<ButtonMask, HalError>;
}

/// Device side of the keyboard wire
pub trait KeyboardWire {
    /// Both clock and data are released (high) by the host
    fn is_idle(&mut self) -> Result<bool, HalError>;

    /// Send one byte. Blocks for the whole frame plus the settle delay.
    fn write_byte(&mut self, byte: u8) -> Result<(), HalError>;
}

/// Single-byte non-volatile settings store
pub trait SettingsStore {
    fn read_byte(&mut self) -> Result<u8, HalError>;

    fn write_byte(&mut self, value: u8) -> Result<(), HalError>;
}

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// PS/2 bit timing, microseconds
pub mod ps2_timing {
    /// Data setup before the falling clock edge, and clock high time
    pub const CLOCK_HALF_US: u32 = 20;
    /// Clock low time
    pub const CLOCK_LOW_US: u32 = 40;
    /// Quiet time after each frame
    pub const SETTLE_US: u32 = 150;
}

/// Device-to-host PS/2 frame for one byte: start, 8 data bits LSB first,
/// odd parity, stop. Index 0 is sent first.
pub fn ps2_frame(byte: u8) -> [bool; 11] {
    let mut frame = [false; 11];
    for bit in 0..8 {
        frame[1 + bit] = byte & (1 << bit) != 0;
    }
    frame[9] = byte.count_ones() % 2 == 0;
    frame[10] = true;
    frame
}

/// PS/2 device port on two open-drain lines.
///
/// `set_high` releases a line, `set_low` drives it. Reading an output pin
/// must return the actual line level, as open-drain GPIO does.
pub struct Ps2Wire<CLK, DATA, D> {
    clock: CLK,
    data: DATA,
    delay: D,
}

impl<CLK, DATA, D> Ps2Wire<CLK, DATA, D>
where
    CLK: InputPin + OutputPin,
    DATA: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(clock: CLK, data: DATA, delay: D) -> Self {
        Self { clock, data, delay }
    }

    /// Release both lines
    pub fn release(&mut self) -> Result<(), HalError> {
        self.clock.set_high().map_err(|_| HalError::GpioError)?;
        self.data.set_high().map_err(|_| HalError::GpioError)
    }

    pub fn into_parts(self) -> (CLK, DATA, D) {
        (self.clock, self.data, self.delay)
    }

    fn send_bit(&mut self, bit: bool) -> Result<(), HalError> {
        // Clock is released here; low means the host is inhibiting
        if self.clock.is_low().map_err(|_| HalError::GpioError)? {
            return Err(HalError::Inhibited);
        }

        if bit {
            self.data.set_high().map_err(|_| HalError::GpioError)?;
        } else {
            self.data.set_low().map_err(|_| HalError::GpioError)?;
        }
        self.delay.delay_us(ps2_timing::CLOCK_HALF_US);
        self.clock.set_low().map_err(|_| HalError::GpioError)?;
        self.delay.delay_us(ps2_timing::CLOCK_LOW_US);
        self.clock.set_high().map_err(|_| HalError::GpioError)?;
        self.delay.delay_us(ps2_timing::CLOCK_HALF_US);
        Ok(())
    }
}

impl<CLK, DATA, D> KeyboardWire for Ps2Wire<CLK, DATA, D>
where
    CLK: InputPin + OutputPin,
    DATA: InputPin + OutputPin,
    D: DelayNs,
{
    fn is_idle(&mut self) -> Result<bool, HalError> {
        let clock = self.clock.is_high().map_err(|_| HalError::GpioError)?;
        let data = self.data.is_high().map_err(|_| HalError::GpioError)?;
        Ok(clock && data)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), HalError> {
        for bit in ps2_frame(byte) {
            if let Err(e) = self.send_bit(bit) {
                self.data.set_high().map_err(|_| HalError::GpioError)?;
                return Err(e);
            }
        }
        self.delay.delay_us(ps2_timing::SETTLE_US);
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;

    extern crate std;
    use std::vec::Vec;

    /// Pad that replays a fixed list of samples, then holds the last one
    #[derive(Default)]
    pub struct MockPad {
        samples: Vec<ButtonMask>,
        next: usize,
        fail: bool,
    }

    impl MockPad {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_samples(samples: &[ButtonMask]) -> Self {
            Self {
                samples: samples.to_vec(),
                ..Self::default()
            }
        }

        pub fn push(&mut self, mask: ButtonMask) {
            self.samples.push(mask);
        }

        /// Make every following sample fail
        pub fn set_failing(&mut self, fail: bool) {
            self.fail = fail;
        }

        /// Samples not yet returned
        pub fn remaining(&self) -> usize {
            self.samples.len().saturating_sub(self.next)
        }
    }

    impl PadInput for MockPad {
        fn sample(&mut self) -> Result<ButtonMask, HalError> {
            if self.fail {
                return Err(HalError::GpioError);
            }
            let mask = match self.samples.get(self.next) {
                Some(mask) => {
                    self.next += 1;
                    *mask
                }
                None => self.samples.last().copied().unwrap_or(ButtonMask::RELEASED),
            };
            Ok(mask)
        }
    }

    /// Wire that records every byte written
    #[derive(Default)]
    pub struct MockWire {
        sent: Vec<u8>,
        busy_polls: usize,
        idle_checks: usize,
        inhibit_next: bool,
    }

    impl MockWire {
        pub fn new() -> Self {
            Self::default()
        }

        /// Report busy for the next `polls` idle checks
        pub fn hold_busy(&mut self, polls: usize) {
            self.busy_polls = polls;
        }

        /// Fail the next write as if the host had pulled the clock low
        pub fn inhibit_next_write(&mut self) {
            self.inhibit_next = true;
        }

        pub fn sent(&self) -> &[u8] {
            &self.sent
        }

        pub fn idle_checks(&self) -> usize {
            self.idle_checks
        }

        pub fn clear(&mut self) {
            self.sent.clear();
        }
    }

    impl KeyboardWire for MockWire {
        fn is_idle(&mut self) -> Result<bool, HalError> {
            self.idle_checks += 1;
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                return Ok(false);
            }
            Ok(true)
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), HalError> {
            if self.inhibit_next {
                self.inhibit_next = false;
                return Err(HalError::Inhibited);
            }
            self.sent.push(byte);
            Ok(())
        }
    }

    /// In-memory settings byte
    #[derive(Default)]
    pub struct MockStore {
        value: Option<u8>,
        writes: Vec<u8>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl MockStore {
        /// Store that has never been written (reads fail)
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_value(value: u8) -> Self {
            Self {
                value: Some(value),
                ..Self::default()
            }
        }

        pub fn value(&self) -> Option<u8> {
            self.value
        }

        /// Every value written, oldest first
        pub fn writes(&self) -> &[u8] {
            &self.writes
        }

        pub fn set_fail_writes(&mut self, fail: bool) {
            self.fail_writes = fail;
        }

        pub fn set_fail_reads(&mut self, fail: bool) {
            self.fail_reads = fail;
        }
    }

    impl SettingsStore for MockStore {
        fn read_byte(&mut self) -> Result<u8, HalError> {
            if self.fail_reads {
                return Err(HalError::StoreError);
            }
            self.value.ok_or(HalError::StoreError)
        }

        fn write_byte(&mut self, value: u8) -> Result<(), HalError> {
            if self.fail_writes {
                return Err(HalError::StoreError);
            }
            self.value = Some(value);
            self.writes.push(value);
            Ok(())
        }
    }

    /// Clock advanced by hand
    #[derive(Default)]
    pub struct ManualClock {
        now_us: Cell<u64>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn advance(&self, duration: Duration) {
            self.now_us.set(self.now_us.get() + duration.as_micros());
        }

        pub fn set(&self, instant: Instant) {
            self.now_us.set(instant.as_micros());
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            Instant::from_micros(self.now_us.get())
        }
    }

    /// Delay that returns at once and adds up what was asked of it
    #[derive(Default)]
    pub struct MockDelay {
        total_ns: u64,
    }

    impl MockDelay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn total_ms(&self) -> u64 {
            self.total_ns / 1_000_000
        }

        pub fn total_us(&self) -> u64 {
            self.total_ns / 1_000
        }
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }
}
