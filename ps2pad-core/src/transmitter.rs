//! Paced transmission of queued bytes onto the keyboard wire

use heapless::spsc::Consumer;
use crate::hal::{Clock, Duration, HalError, Instant, KeyboardWire};

/// Sends at most one queued byte per call, no sooner than `interval` after
/// the previous one.
#[derive(Debug)]
pub struct Transmitter {
    interval: Duration,
    last_sent: Option<Instant>,
}

impl Transmitter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
        }
    }

    /// Time of the last successful write, if any
    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }

    /// True once `interval` has passed since the last byte
    pub fn interval_elapsed(&self, now: Instant) -> bool {
        match self.last_sent {
            Some(last) => now.duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Send the oldest queued byte if the pacing interval allows.
    ///
    /// Spins until the host releases both lines; there is no timeout. The
    /// byte is only removed from the queue after the wire accepted it, so a
    /// write that fails (for example because the host inhibited it) is
    /// retried on a later call. Returns the byte sent, if any.
    pub fn drain<W, C, const N: usize>(
        &mut self,
        queue: &mut Consumer<'_, u8, N>,
        wire: &mut W,
        clock: &C,
    ) -> Result<Option<u8>, HalError>
    where
        W: KeyboardWire,
        C: Clock,
    {
        let byte = match queue.peek() {
            Some(&byte) => byte,
            None => return Ok(None),
        };
        if !self.interval_elapsed(clock.now()) {
            return Ok(None);
        }

        while !wire.is_idle()? {
            core::hint::spin_loop();
        }
        wire.write_byte(byte)?;

        queue.dequeue();
        self.last_sent = Some(clock.now());

        #[cfg(feature = "defmt")]
        defmt::trace!("sent {=u8:#x}", byte);

        Ok(Some(byte))
    }
}
