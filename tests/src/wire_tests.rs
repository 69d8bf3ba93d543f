//! PS/2 device framing against scripted pin transactions

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use ps2pad_core::{ps2_frame, HalError, KeyboardWire, Ps2Wire};

fn level(bit: bool) -> PinState {
    if bit {
        PinState::High
    } else {
        PinState::Low
    }
}

/// Clock and data transactions for one full frame
fn frame_transactions(byte: u8) -> (Vec<PinTransaction>, Vec<PinTransaction>) {
    let mut clock = Vec::new();
    let mut data = Vec::new();
    for bit in ps2_frame(byte) {
        // Inhibit check, then one clock pulse
        clock.push(PinTransaction::get(PinState::High));
        clock.push(PinTransaction::set(PinState::Low));
        clock.push(PinTransaction::set(PinState::High));
        data.push(PinTransaction::set(level(bit)));
    }
    (clock, data)
}

#[test]
fn test_idle_needs_both_lines_high() {
    let mut clock = PinMock::new(&[
        PinTransaction::get(PinState::High),
        PinTransaction::get(PinState::Low),
    ]);
    let mut data = PinMock::new(&[
        PinTransaction::get(PinState::High),
        PinTransaction::get(PinState::High),
    ]);

    let mut wire = Ps2Wire::new(clock.clone(), data.clone(), NoopDelay::new());
    assert_eq!(wire.is_idle(), Ok(true));
    assert_eq!(wire.is_idle(), Ok(false));

    clock.done();
    data.done();
}

#[test]
fn test_write_byte_frames() {
    for byte in [0x00, 0x1C, 0x5A, 0xE0, 0xF0, 0xFF] {
        let (clock_tx, data_tx) = frame_transactions(byte);
        let mut clock = PinMock::new(&clock_tx);
        let mut data = PinMock::new(&data_tx);

        let mut wire = Ps2Wire::new(clock.clone(), data.clone(), NoopDelay::new());
        assert_eq!(wire.write_byte(byte), Ok(()));

        clock.done();
        data.done();
    }
}

#[test]
fn test_inhibit_mid_frame_releases_data() {
    let (full_clock, full_data) = frame_transactions(0x45);
    // Two bits out, then the host holds the clock low
    let mut clock_tx = full_clock[..6].to_vec();
    clock_tx.push(PinTransaction::get(PinState::Low));
    let mut data_tx = full_data[..2].to_vec();
    data_tx.push(PinTransaction::set(PinState::High));

    let mut clock = PinMock::new(&clock_tx);
    let mut data = PinMock::new(&data_tx);

    let mut wire = Ps2Wire::new(clock.clone(), data.clone(), NoopDelay::new());
    assert_eq!(wire.write_byte(0x45), Err(HalError::Inhibited));

    clock.done();
    data.done();
}

#[test]
fn test_release_sets_both_lines_high() {
    let mut clock = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let mut data = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut wire = Ps2Wire::new(clock.clone(), data.clone(), NoopDelay::new());
    assert_eq!(wire.release(), Ok(()));

    clock.done();
    data.done();
}
