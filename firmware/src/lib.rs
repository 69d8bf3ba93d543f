#![no_std]

//! CH32V203 board support for the pad to PS/2 translator

pub mod ch32v203_hardware;
pub mod time_driver;

pub use ch32v203_hardware::*;

use embassy_time::Delay;
use ps2pad_core::{EmbassyClock, PadBridge, Ps2Wire, ShiftRegisterPad};

/// Pad on PA0-PA2
pub type BoardPad = ShiftRegisterPad<GpioPin, GpioPin, GpioPin, Delay>;
/// PS/2 port on PB6/PB7
pub type BoardWire = Ps2Wire<GpioPin, GpioPin, Delay>;
/// Complete translator on this board
pub type BoardBridge = PadBridge<BoardPad, BoardWire, FlashSettingsStore, Delay, EmbassyClock>;

/// Bring up clocks and pins and build the translator
pub fn init_board(config: ps2pad_core::PadConfig) -> BoardBridge {
    time_driver::init();
    enable_gpio_clocks();

    let pin = |(port, pin): (Port, u8), mode| GpioPin::new(port, pin, mode);

    let pad = ShiftRegisterPad::new(
        pin(pins::PAD_LATCH, PinMode::PushPull),
        pin(pins::PAD_CLOCK, PinMode::PushPull),
        pin(pins::PAD_DATA, PinMode::PullUpInput),
        Delay,
    );

    let mut wire = Ps2Wire::new(
        pin(pins::PS2_CLOCK, PinMode::OpenDrain),
        pin(pins::PS2_DATA, PinMode::OpenDrain),
        Delay,
    );
    if let Err(_e) = wire.release() {
        #[cfg(feature = "defmt")]
        defmt::warn!("PS/2 line release failed: {:?}", _e);
    }

    #[cfg(feature = "defmt")]
    defmt::info!("🔌 CH32V203 pins configured");

    PadBridge::new(pad, wire, FlashSettingsStore::new(), Delay, EmbassyClock, config)
}
