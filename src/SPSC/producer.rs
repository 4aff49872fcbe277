// In src/SPSC/producer.rs
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Buffer::GrayFifo;

/// The producer-domain handle of a split fifo channel.
///
/// Owns the producer side exclusively. Every send also advances the
/// producer-domain tick, so a thread looping on this handle is a valid
/// driver for that domain.
pub struct Producer<T> {
    fifo: Arc<GrayFifo<T>>,
    alive: Arc<AtomicBool>,
    peer_alive: Arc<AtomicBool>,
}

impl<T: Copy> Producer<T> {
    pub(crate) fn new(
        fifo: Arc<GrayFifo<T>>,
        alive: Arc<AtomicBool>,
        peer_alive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            fifo,
            alive,
            peer_alive,
        }
    }

    /// Sends a record through the channel.
    ///
    /// Advances the producer tick, then attempts the write.
    ///
    /// # Returns
    /// * `Ok(())` if the record was accepted
    /// * `Err(WouldBlock)` if the ring is full - flow control, retry later
    /// * `Err(BrokenPipe)` if the consumer handle has been dropped
    pub fn send(&self, record: T) -> io::Result<()> {
        self.fifo.producer_step();

        if self.fifo.try_write(record) {
            return Ok(());
        }

        if !self.peer_alive.load(Ordering::Acquire) {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Consumer has terminated",
            ));
        }

        Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "Failed to write record - buffer full",
        ))
    }

    /// Sends a batch of records, all or nothing.
    ///
    /// Admission is decided against the producer's pessimistic occupancy
    /// belief, so an admitted batch never lands on unread records.
    pub fn send_batch(&self, records: &[T]) -> io::Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if records.len() > self.fifo.capacity() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Batch too large ({} > {})",
                    records.len(),
                    self.fifo.capacity()
                ),
            ));
        }

        self.fifo.producer_step();

        let free = self.fifo.capacity() - self.fifo.producer_len_hint();
        if records.len() > free {
            if !self.peer_alive.load(Ordering::Acquire) {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "Consumer has terminated",
                ));
            }
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "Not enough room for batch",
            ));
        }

        for record in records {
            if !self.fifo.try_write(*record) {
                // Admission already reserved the room; unreachable with a
                // single producer thread.
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "Buffer filled mid-batch",
                ));
            }
        }
        Ok(())
    }

    /// Advance the producer-domain tick without sending.
    pub fn step(&self) {
        self.fifo.producer_step();
    }

    /// Producer-side view of the full predicate.
    pub fn is_full(&self) -> bool {
        self.fifo.is_full()
    }

    /// Number of record slots in the channel.
    pub fn capacity(&self) -> usize {
        self.fifo.capacity()
    }

    /// Returns a reference to the keep-alive flag for this side.
    ///
    /// The consumer observes it to learn the producer has departed.
    pub fn keep_alive(&self) -> &Arc<AtomicBool> {
        &self.alive
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}
