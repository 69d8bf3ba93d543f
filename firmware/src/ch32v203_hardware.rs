//! CH32V203 Hardware Implementation
//!
//! 64KB Flash / 20KB RAM. Raw register access for the few peripherals the
//! translator needs: GPIO ports A and B, and the flash controller.

use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use ps2pad_core::{HalError, SettingsStore};

/// CH32V203 Memory Map
const RCC_BASE: usize = 0x4002_1000;
const GPIOA_BASE: usize = 0x4001_0800;
const GPIOB_BASE: usize = 0x4001_0C00;
const FLASH_BASE: usize = 0x4002_2000;

/// RCC Register offsets
const RCC_APB2PCENR: usize = 0x18;
const RCC_IOPAEN: u32 = 1 << 2;
const RCC_IOPBEN: u32 = 1 << 3;

/// GPIO Register offsets
const GPIO_CFGLR: usize = 0x00;
const GPIO_CFGHR: usize = 0x04;
const GPIO_INDR: usize = 0x08;
const GPIO_BSHR: usize = 0x10;

/// Flash Register offsets
const FLASH_KEYR: usize = 0x04;
const FLASH_STATR: usize = 0x0C;
const FLASH_CTLR: usize = 0x10;
const FLASH_ADDR: usize = 0x14;

const FLASH_KEY1: u32 = 0x4567_0123;
const FLASH_KEY2: u32 = 0xCDEF_89AB;

const STATR_BSY: u32 = 1 << 0;
const STATR_WRPRTERR: u32 = 1 << 4;
const STATR_EOP: u32 = 1 << 5;

const CTLR_PG: u32 = 1 << 0;
const CTLR_PER: u32 = 1 << 1;
const CTLR_STRT: u32 = 1 << 6;
const CTLR_LOCK: u32 = 1 << 7;

/// Busy-wait bound for one flash operation
const FLASH_TIMEOUT: u32 = 1_000_000;

#[inline(always)]
fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

#[inline(always)]
fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Enable the clocks of GPIO ports A and B
pub fn enable_gpio_clocks() {
    let addr = RCC_BASE + RCC_APB2PCENR;
    write_reg(addr, read_reg(addr) | RCC_IOPAEN | RCC_IOPBEN);
}

/// GPIO port
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Port {
    A,
    B,
}

impl Port {
    const fn base(self) -> usize {
        match self {
            Port::A => GPIOA_BASE,
            Port::B => GPIOB_BASE,
        }
    }
}

/// Pin configuration nibble: CNF[1:0] MODE[1:0]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PinMode {
    /// Push-pull output, 50 MHz
    PushPull = 0b0011,
    /// Open-drain output, 50 MHz. The input register still shows the line.
    OpenDrain = 0b0111,
    /// Input with pull-up or pull-down, selected by OUTDR
    PullUpInput = 0b1000,
}

/// One GPIO pin with embedded-hal digital traits
pub struct GpioPin {
    port: Port,
    pin: u8,
}

impl GpioPin {
    /// Take a pin and configure it. `pin` must be 0..=15 and not claimed
    /// elsewhere.
    pub fn new(port: Port, pin: u8, mode: PinMode) -> Self {
        let gpio = Self { port, pin };
        gpio.configure(mode);
        gpio
    }

    fn configure(&self, mode: PinMode) {
        let (reg, shift) = if self.pin < 8 {
            (GPIO_CFGLR, self.pin * 4)
        } else {
            (GPIO_CFGHR, (self.pin - 8) * 4)
        };
        let addr = self.port.base() + reg;
        let cfg = (read_reg(addr) & !(0xF << shift)) | ((mode as u32) << shift);

        match mode {
            // Pull-up, and released lines, start high
            PinMode::PullUpInput | PinMode::OpenDrain => self.write(true),
            PinMode::PushPull => self.write(false),
        }
        write_reg(addr, cfg);
    }

    fn write(&self, high: bool) {
        let bit = if high { 1 << self.pin } else { 1 << (self.pin + 16) };
        write_reg(self.port.base() + GPIO_BSHR, bit);
    }

    fn level(&self) -> bool {
        read_reg(self.port.base() + GPIO_INDR) & (1 << self.pin) != 0
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

/// CH32V203 pin assignment
pub mod pins {
    use super::Port;

    /// Pad latch (PA0)
    pub const PAD_LATCH: (Port, u8) = (Port::A, 0);
    /// Pad clock (PA1)
    pub const PAD_CLOCK: (Port, u8) = (Port::A, 1);
    /// Pad serial data (PA2)
    pub const PAD_DATA: (Port, u8) = (Port::A, 2);
    /// PS/2 clock, open-drain (PB6)
    pub const PS2_CLOCK: (Port, u8) = (Port::B, 6);
    /// PS/2 data, open-drain (PB7)
    pub const PS2_DATA: (Port, u8) = (Port::B, 7);
}

/// Settings byte kept in the last flash page.
///
/// Stored as one half-word: the low byte is the settings byte, the high
/// byte its complement. Anything else (erased flash included) reads as a
/// store error.
pub struct FlashSettingsStore {
    address: usize,
}

impl FlashSettingsStore {
    /// Settings page, outside the 60K code region in memory.x
    pub const PAGE_ADDRESS: usize = 0x0800_F000;

    pub const fn new() -> Self {
        Self {
            address: Self::PAGE_ADDRESS,
        }
    }

    fn read_half_word(&self) -> u16 {
        unsafe { core::ptr::read_volatile(self.address as *const u16) }
    }

    fn unlock(&self) {
        if read_reg(FLASH_BASE + FLASH_CTLR) & CTLR_LOCK != 0 {
            write_reg(FLASH_BASE + FLASH_KEYR, FLASH_KEY1);
            write_reg(FLASH_BASE + FLASH_KEYR, FLASH_KEY2);
        }
    }

    fn lock(&self) {
        let ctlr = FLASH_BASE + FLASH_CTLR;
        write_reg(ctlr, read_reg(ctlr) | CTLR_LOCK);
    }

    fn wait_ready(&self) -> Result<(), HalError> {
        for _ in 0..FLASH_TIMEOUT {
            let statr = read_reg(FLASH_BASE + FLASH_STATR);
            if statr & STATR_BSY == 0 {
                // Clear flags by writing ones
                write_reg(FLASH_BASE + FLASH_STATR, STATR_EOP | STATR_WRPRTERR);
                if statr & STATR_WRPRTERR != 0 {
                    return Err(HalError::StoreError);
                }
                return Ok(());
            }
        }
        Err(HalError::StoreError)
    }

    fn erase_page(&self) -> Result<(), HalError> {
        let ctlr = FLASH_BASE + FLASH_CTLR;
        write_reg(ctlr, read_reg(ctlr) | CTLR_PER);
        write_reg(FLASH_BASE + FLASH_ADDR, self.address as u32);
        write_reg(ctlr, read_reg(ctlr) | CTLR_STRT);
        let result = self.wait_ready();
        write_reg(ctlr, read_reg(ctlr) & !CTLR_PER);
        result
    }

    fn program_half_word(&self, value: u16) -> Result<(), HalError> {
        let ctlr = FLASH_BASE + FLASH_CTLR;
        write_reg(ctlr, read_reg(ctlr) | CTLR_PG);
        unsafe { core::ptr::write_volatile(self.address as *mut u16, value) };
        let result = self.wait_ready();
        write_reg(ctlr, read_reg(ctlr) & !CTLR_PG);
        result
    }
}

impl Default for FlashSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

const fn pack(value: u8) -> u16 {
    ((!value as u16) << 8) | value as u16
}

impl SettingsStore for FlashSettingsStore {
    fn read_byte(&mut self) -> Result<u8, HalError> {
        let raw = self.read_half_word();
        let value = raw as u8;
        if raw == pack(value) {
            Ok(value)
        } else {
            Err(HalError::StoreError)
        }
    }

    fn write_byte(&mut self, value: u8) -> Result<(), HalError> {
        let packed = pack(value);
        if self.read_half_word() == packed {
            return Ok(());
        }

        self.unlock();
        let result = self.erase_page().and_then(|()| self.program_half_word(packed));
        self.lock();
        result?;

        if self.read_half_word() == packed {
            #[cfg(feature = "defmt")]
            defmt::debug!("Settings written to flash: {=u8:#x}", value);
            Ok(())
        } else {
            Err(HalError::StoreError)
        }
    }
}
