//! Test utilities for pad translator functionality

#[cfg(feature = "test-utils")]
pub mod pad_script {
    //! Scripted pad input for simulation

    extern crate std;

    use crate::hal::mock::MockPad;
    use crate::types::{Button, ButtonMask};
    use std::vec::Vec;

    /// Button change applied at a given cycle
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PadEvent {
        pub cycle: usize,
        pub button: Button,
        pub pressed: bool,
    }

    /// Timeline of button presses, expanded into one sample per cycle
    #[derive(Debug, Clone, Default)]
    pub struct PadScript {
        events: Vec<PadEvent>,
        cursor: usize,
        description: &'static str,
    }

    impl PadScript {
        pub fn new(description: &'static str) -> Self {
            Self {
                description,
                ..Self::default()
            }
        }

        pub fn description(&self) -> &'static str {
            self.description
        }

        /// Advance the script cursor by `cycles`
        pub fn wait(mut self, cycles: usize) -> Self {
            self.cursor += cycles;
            self
        }

        pub fn press(mut self, button: Button) -> Self {
            self.events.push(PadEvent { cycle: self.cursor, button, pressed: true });
            self
        }

        pub fn release(mut self, button: Button) -> Self {
            self.events.push(PadEvent { cycle: self.cursor, button, pressed: false });
            self
        }

        /// Press, hold for `cycles`, release
        pub fn tap(self, button: Button, cycles: usize) -> Self {
            self.press(button).wait(cycles).release(button)
        }

        pub fn events(&self) -> &[PadEvent] {
            &self.events
        }

        /// One sample per cycle up to and including the cursor
        pub fn samples(&self) -> Vec<ButtonMask> {
            let mut held = ButtonMask::RELEASED.raw();
            let mut samples = Vec::with_capacity(self.cursor + 1);
            for cycle in 0..=self.cursor {
                for event in self.events.iter().filter(|e| e.cycle == cycle) {
                    if event.pressed {
                        held &= !event.button.bit();
                    } else {
                        held |= event.button.bit();
                    }
                }
                samples.push(ButtonMask(held));
            }
            samples
        }

        /// Mock pad replaying this script
        pub fn into_pad(self) -> MockPad {
            MockPad::with_samples(&self.samples())
        }

        /// Select a profile from normal mode: hold Select, tap the
        /// direction, hold Select one more cycle, release Select
        pub fn select_profile(self, direction: Button) -> Self {
            self.press(Button::Select)
                .wait(1)
                .tap(direction, 1)
                .wait(2)
                .release(Button::Select)
                .wait(1)
        }
    }
}
