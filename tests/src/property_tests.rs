//! Invariants over arbitrary button sequences

use crate::{decode_stream, Harness, WireEvent};
use ps2pad_core::{ps2_frame, Button, ButtonMask, Key, Profile, Settings};
use proptest::prelude::*;
use std::collections::HashMap;

fn profile_strategy() -> impl Strategy<Value = Profile> {
    prop::sample::select(Profile::ALL.to_vec())
}

/// Raw masks with Select always released
fn normal_mask() -> impl Strategy<Value = ButtonMask> {
    any::<u8>().prop_map(|raw| ButtonMask(raw | Button::Select.bit()))
}

proptest! {
    #[test]
    fn frame_parity_is_odd(byte in any::<u8>()) {
        let frame = ps2_frame(byte);
        let ones = frame[1..10].iter().filter(|bit| **bit).count();
        prop_assert_eq!(ones % 2, 1);
        prop_assert!(!frame[0]);
        prop_assert!(frame[10]);
    }

    #[test]
    fn settings_byte_ignores_reserved_bits(raw in any::<u8>()) {
        let decoded = Settings::decode(raw);
        prop_assert_eq!(decoded, Settings::decode(raw & 0b111));
        if let Some(settings) = decoded {
            prop_assert_eq!(settings.encode(), raw & 0b111);
        }
    }

    /// Every make has a matching break once all buttons are let go, and no
    /// key is broken before it was made.
    #[test]
    fn makes_and_breaks_balance(
        profile in profile_strategy(),
        swap_ab in any::<bool>(),
        masks in prop::collection::vec(normal_mask(), 1..40),
    ) {
        let mut harness = Harness::new(Settings { profile, swap_ab });
        for mask in masks {
            harness.step(mask);
            harness.settle();
        }
        harness.step(ButtonMask::RELEASED);
        harness.settle();

        let events = decode_stream(harness.sent());
        prop_assert!(events.is_some());

        let mut held: HashMap<Key, i32> = HashMap::new();
        for event in events.unwrap_or_default() {
            match event {
                WireEvent::Make(Key::Pause) => {}
                WireEvent::Make(key) => *held.entry(key).or_default() += 1,
                WireEvent::Break(key) => {
                    let count = held.entry(key).or_default();
                    *count -= 1;
                    prop_assert!(*count >= 0, "break before make for {:?}", key);
                }
            }
        }
        prop_assert!(held.values().all(|count| *count == 0));
        prop_assert!(!harness.bridge().fsm().keys().any());
    }

    /// A settings change never leaves a key down on the host
    #[test]
    fn profile_switch_leaves_nothing_held(
        start in profile_strategy(),
        held in any::<u8>(),
        direction in prop::sample::select(vec![Button::Down, Button::Left, Button::Right, Button::Up]),
    ) {
        let mut harness = Harness::new(Settings { profile: start, swap_ab: false });
        let held = ButtonMask(held | direction.bit());
        harness.step(held);
        let with_select = ButtonMask(held.raw() & !Button::Select.bit());
        harness.step(with_select);
        let report = harness.step(ButtonMask(with_select.raw() & !direction.bit()));

        let change = report.step.and_then(|s| s.change);
        prop_assert!(change.is_some());
        prop_assert!(!harness.bridge().fsm().keys().any());
    }
}
