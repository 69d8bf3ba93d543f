//! Game pad shift register sampling

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use crate::hal::{HalError, PadInput};
use crate::types::{ButtonMask, BUTTON_COUNT};

/// Latch pulse width
pub const LATCH_PULSE_US: u32 = 12;
/// Clock half period
pub const CLOCK_HALF_US: u32 = 6;

/// Parallel-in serial-out pad (4021 style) on latch, clock and data lines.
///
/// A latch pulse captures all eight buttons; each clock pulse then shifts
/// the next one onto the data line, A first. The data line reads low while
/// the current button is held, and the returned mask keeps that polarity.
pub struct ShiftRegisterPad<LATCH, CLOCK, DATA, D> {
    latch: LATCH,
    clock: CLOCK,
    data: DATA,
    delay: D,
}

impl<LATCH, CLOCK, DATA, D> ShiftRegisterPad<LATCH, CLOCK, DATA, D>
where
    LATCH: OutputPin,
    CLOCK: OutputPin,
    DATA: InputPin,
    D: DelayNs,
{
    pub fn new(latch: LATCH, clock: CLOCK, data: DATA, delay: D) -> Self {
        Self {
            latch,
            clock,
            data,
            delay,
        }
    }

    pub fn into_parts(self) -> (LATCH, CLOCK, DATA, D) {
        (self.latch, self.clock, self.data, self.delay)
    }
}

impl<LATCH, CLOCK, DATA, D> PadInput for ShiftRegisterPad<LATCH, CLOCK, DATA, D>
where
    LATCH: OutputPin,
    CLOCK: OutputPin,
    DATA: InputPin,
    D: DelayNs,
{
    fn sample(&mut self) -> Result<ButtonMask, HalError> {
        self.latch.set_high().map_err(|_| HalError::GpioError)?;
        self.delay.delay_us(LATCH_PULSE_US);
        self.latch.set_low().map_err(|_| HalError::GpioError)?;
        self.delay.delay_us(CLOCK_HALF_US);

        let mut raw = 0u8;
        for bit in 0..BUTTON_COUNT {
            if self.data.is_high().map_err(|_| HalError::GpioError)? {
                raw |= 1 << bit;
            }
            self.clock.set_high().map_err(|_| HalError::GpioError)?;
            self.delay.delay_us(CLOCK_HALF_US);
            self.clock.set_low().map_err(|_| HalError::GpioError)?;
            self.delay.delay_us(CLOCK_HALF_US);
        }

        Ok(ButtonMask(raw))
    }
}
