use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::Buffer::GrayFifo;
use super::{Consumer, Producer};

/// Builds a fifo channel and splits it into its two domain handles.
pub struct FifoBuilder {
    capacity: usize,
}

impl Default for FifoBuilder {
    fn default() -> Self {
        Self {
            capacity: 1024, // 1024 slots default
        }
    }
}

impl FifoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the channel.
    ///
    /// The split enforces the one-thread-per-domain discipline: exactly one
    /// producer handle and one consumer handle exist, and neither is Clone.
    ///
    /// # Returns
    /// * `Ok((producer, consumer))` on success
    /// * `Err(io::Error)` with `InvalidInput` if the capacity is not a power of two >= 2
    pub fn build<T: Copy>(self) -> io::Result<(Producer<T>, Consumer<T>)> {
        let fifo = Arc::new(GrayFifo::with_capacity(self.capacity)?);
        let producer_alive = Arc::new(AtomicBool::new(true));
        let consumer_alive = Arc::new(AtomicBool::new(true));

        let producer = Producer::new(
            Arc::clone(&fifo),
            Arc::clone(&producer_alive),
            Arc::clone(&consumer_alive),
        );
        let consumer = Consumer::new(fifo, consumer_alive, producer_alive);
        Ok((producer, consumer))
    }
}
