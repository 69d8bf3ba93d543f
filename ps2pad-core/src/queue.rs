//! Outbound byte queue between the encoder and the transmitter
//!
//! A `heapless` single-producer single-consumer ring: the encoder holds the
//! [`Producer`], the transmitter the [`Consumer`]. Each side only advances
//! its own index, after the byte is stored or consumed, so the two halves
//! may live in different execution contexts without a lock.

use heapless::spsc::{Producer, Queue};

/// Ring size. One slot always stays free, so 63 bytes fit.
pub const QUEUE_SIZE: usize = 64;

/// Queue used by the translator
pub type OutputQueue = Queue<u8, QUEUE_SIZE>;

/// Slots currently available to the producer
pub fn free_slots<const N: usize>(queue: &Producer<'_, u8, N>) -> usize {
    queue.capacity() - queue.len()
}

/// Enqueue a single byte, dropping it if the queue is full.
///
/// Returns true if the byte was stored.
pub fn enqueue<const N: usize>(queue: &mut Producer<'_, u8, N>, byte: u8) -> bool {
    match queue.enqueue(byte) {
        Ok(()) => true,
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Output queue full, dropped {=u8:#x}", byte);
            false
        }
    }
}

/// Enqueue a whole sequence or nothing.
///
/// Returns the number of bytes stored: `bytes.len()` or zero.
pub fn enqueue_all<const N: usize>(queue: &mut Producer<'_, u8, N>, bytes: &[u8]) -> usize {
    if free_slots(queue) < bytes.len() {
        #[cfg(feature = "defmt")]
        defmt::warn!("Output queue full, dropped {}-byte sequence", bytes.len());
        return 0;
    }
    for &byte in bytes {
        // Cannot fail: space was checked and only this side adds bytes
        let _ = queue.enqueue(byte);
    }
    bytes.len()
}
