//! Shift register sampling against scripted pin transactions

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use ps2pad_core::{Button, ButtonMask, PadInput, ShiftRegisterPad};

fn latch_pulse() -> Vec<PinTransaction> {
    vec![
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ]
}

fn clock_pulses(count: usize) -> Vec<PinTransaction> {
    (0..count)
        .flat_map(|_| [PinTransaction::set(PinState::High), PinTransaction::set(PinState::Low)])
        .collect()
}

/// Data line levels for `raw`, A first
fn data_reads(raw: u8) -> Vec<PinTransaction> {
    (0..8)
        .map(|bit| {
            let state = if raw & (1 << bit) != 0 { PinState::High } else { PinState::Low };
            PinTransaction::get(state)
        })
        .collect()
}

fn sample_raw(raw: u8) -> ButtonMask {
    let mut latch = PinMock::new(&latch_pulse());
    let mut clock = PinMock::new(&clock_pulses(8));
    let mut data = PinMock::new(&data_reads(raw));

    let mut pad = ShiftRegisterPad::new(latch.clone(), clock.clone(), data.clone(), NoopDelay::new());
    let mask = pad.sample().unwrap();

    latch.done();
    clock.done();
    data.done();
    mask
}

#[test]
fn test_nothing_pressed() {
    assert_eq!(sample_raw(0xFF), ButtonMask::RELEASED);
}

#[test]
fn test_bit_order_matches_buttons() {
    for button in Button::ALL {
        let mask = sample_raw(!button.bit());
        assert_eq!(mask, ButtonMask::from_pressed(&[button]));
        for other in Button::ALL {
            assert_eq!(mask.is_pressed(other), other == button);
        }
    }
}

#[test]
fn test_chord() {
    let raw = !(Button::Select.bit() | Button::Down.bit());
    let mask = sample_raw(raw);
    assert!(mask.is_pressed(Button::Select));
    assert!(mask.is_pressed(Button::Down));
    assert_eq!(mask.buttons().count(), 2);
}

#[test]
fn test_consecutive_samples_relatch() {
    let mut latch = PinMock::new(&[latch_pulse(), latch_pulse()].concat());
    let mut clock = PinMock::new(&clock_pulses(16));
    let mut data = PinMock::new(&[data_reads(0xFF), data_reads(0xFE)].concat());

    let mut pad = ShiftRegisterPad::new(latch.clone(), clock.clone(), data.clone(), NoopDelay::new());
    assert_eq!(pad.sample(), Ok(ButtonMask::RELEASED));
    assert_eq!(pad.sample(), Ok(ButtonMask::from_pressed(&[Button::A])));

    latch.done();
    clock.done();
    data.done();
}
