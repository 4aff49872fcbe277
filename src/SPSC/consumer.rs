// src/SPSC/consumer.rs

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::Buffer::GrayFifo;

/// The consumer-domain handle of a split fifo channel.
///
/// Owns the consumer side exclusively. Every receive also advances the
/// consumer-domain tick, so a thread looping on this handle is a valid
/// driver for that domain.
pub struct Consumer<T> {
    fifo: Arc<GrayFifo<T>>,
    alive: Arc<AtomicBool>,
    peer_alive: Arc<AtomicBool>,
}

impl<T: Copy> Consumer<T> {
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

    /// Receives a record from the channel if one is visible.
    ///
    /// Advances the consumer tick, then attempts the read. A freshly
    /// written record needs two consumer ticks to cross the barrier, so
    /// `Ok(None)` may just mean "not visible yet".
    ///
    /// # Returns
    /// * `Ok(Some(record))` if a record was received
    /// * `Ok(None)` if nothing is visible
    /// * `Err(BrokenPipe)` if the producer handle is gone and the channel has drained
    pub fn receive(&self) -> io::Result<Option<T>> {
        self.fifo.consumer_step();

        if let Some(record) = self.fifo.try_read() {
            return Ok(Some(record));
        }

        if !self.peer_alive.load(Ordering::Acquire) {
            // One more tick lets anything already published finish crossing
            // the barrier before the stream is declared over.
            self.fifo.consumer_step();
            if let Some(record) = self.fifo.try_read() {
                return Ok(Some(record));
            }
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Producer has terminated",
            ));
        }

        Ok(None)
    }

    /// Receives a record, spinning until one arrives or the producer
    /// departs.
    ///
    /// Each spin advances the consumer tick; this is a driver loop around
    /// the non-blocking core, not a blocking primitive inside it.
    pub fn receive_blocking(&self) -> io::Result<T> {
        loop {
            match self.receive()? {
                Some(record) => return Ok(record),
                None => std::thread::yield_now(),
            }
        }
    }

    /// Receives a record, waiting up to the specified timeout.
    ///
    /// # Arguments
    /// * `timeout` - Maximum time to wait for a record
    ///
    /// # Returns
    /// * `Ok(Some(record))` if a record arrived in time
    /// * `Ok(None)` if the timeout was reached
    /// * `Err(BrokenPipe)` if the producer handle is gone and the channel has drained
    pub fn receive_timeout(&self, timeout: Duration) -> io::Result<Option<T>> {
        let start = Instant::now();

        loop {
            match self.receive()? {
                Some(record) => return Ok(Some(record)),
                None => {
                    let elapsed = start.elapsed();
                    if elapsed >= timeout {
                        return Ok(None);
                    }
                    // Capped sleep keeps the idle path off the CPU.
                    let sleep_time = std::cmp::min(timeout - elapsed, Duration::from_millis(1));
                    std::thread::sleep(sleep_time);
                }
            }
        }
    }

    /// Advance the consumer-domain tick without reading.
    pub fn step(&self) {
        self.fifo.consumer_step();
    }

    /// Consumer-side view of the empty predicate.
    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    /// Number of record slots in the channel.
    pub fn capacity(&self) -> usize {
        self.fifo.capacity()
    }

    /// Returns a reference to the producer-alive flag.
    ///
    /// When the producer handle drops, this flag goes false.
    pub fn producer_alive(&self) -> &Arc<AtomicBool> {
        &self.peer_alive
    }
}

impl<T> Drop for Consumer<T> {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}
