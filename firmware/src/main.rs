#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// Panic handler
use panic_halt as _;

use riscv_rt::entry;

use ps2pad_firmware::init_board;

/// Main firmware entry point
#[entry]
fn main() -> ! {
    #[cfg(feature = "defmt")]
    defmt::info!("🔧 PS/2 pad firmware starting...");

    let config = ps2pad_core::default_config();
    let mut bridge = init_board(config);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "⚙️ Profile {:?}, swap A/B: {}",
        bridge.settings().profile,
        bridge.settings().swap_ab
    );

    bridge.run()
}
