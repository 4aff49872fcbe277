use std::cell::UnsafeCell;
use std::fmt;
use std::io;
use std::mem::MaybeUninit;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

use crossbeam_utils::CachePadded;

use super::gray;
use super::Buffer::GrayFifo;
use crate::SPSC::Structs::Buffer_Structs::DomainRegs;

impl<T: Copy> GrayFifo<T> {
    /// Create a fifo with `capacity` record slots and all counters zeroed.
    ///
    /// # Arguments
    /// * `capacity` - Ring size in records; must be a power of two and at least 2
    ///
    /// # Returns
    /// * `Ok(fifo)` on success
    /// * `Err(io::Error)` with `InvalidInput` if the capacity is invalid
    pub fn with_capacity(capacity: usize) -> io::Result<Self> {
        if !capacity.is_power_of_two() || capacity < 2 || capacity > usize::MAX >> 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid capacity {}: must be a power of two >= 2", capacity),
            ));
        }

        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();

        Ok(Self {
            slots,
            capacity,
            mask: capacity - 1,
            code_mask: (capacity << 1) - 1,
            writer: CachePadded::new(DomainRegs::new()),
            reader: CachePadded::new(DomainRegs::new()),
        })
    }

    /// Number of record slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accept one record into the ring. Producer domain only.
    ///
    /// Returns false, with no state change, when the ring looks full from
    /// the producer's pessimistic viewpoint. That is backpressure to be
    /// handled by the caller, not an error.
    pub fn try_write(&self, record: T) -> bool {
        let code = self.writer.code.load(Relaxed);
        let believed_rd = self.writer.foreign_stage2.load(Relaxed);
        if gray::full_from_codes(code, believed_rd, self.code_mask) {
            return false;
        }

        let pos = self.writer.pos.load(Relaxed);
        // Sole producer; the consumer cannot touch this slot until the
        // advanced code has crossed its barrier.
        unsafe {
            (*self.slots[pos & self.mask].get()).write(record);
        }

        let next = (pos + 1) & self.code_mask;
        self.writer.pos.store(next, Relaxed);
        // Release orders the slot store before any foreign observation of
        // the advanced code. The whole design hangs on this edge.
        self.writer.code.store(gray::encode(next), Release);
        true
    }

    /// Take one record out of the ring. Consumer domain only.
    ///
    /// Returns `None`, with no state change, when the ring looks empty from
    /// the consumer's pessimistic viewpoint. A freshly written record needs
    /// two consumer ticks to become visible.
    pub fn try_read(&self) -> Option<T> {
        let code = self.reader.code.load(Relaxed);
        let believed_wr = self.reader.foreign_stage2.load(Relaxed);
        if gray::empty_from_codes(code, believed_wr) {
            return None;
        }

        let pos = self.reader.pos.load(Relaxed);
        // The barrier only lets the belief cover slots whose writes were
        // published, so the slot is initialized.
        let record = unsafe { (*self.slots[pos & self.mask].get()).assume_init_read() };

        let next = (pos + 1) & self.code_mask;
        self.reader.pos.store(next, Relaxed);
        // Release keeps the slot load ahead of the code the producer will
        // use to reclaim the slot.
        self.reader.code.store(gray::encode(next), Release);
        Some(record)
    }

    /// Advance the producer-domain barrier by one tick: the consumer's code
    /// shifts one stage deeper. To be called once per producer tick by
    /// whatever drives that domain.
    pub fn producer_step(&self) {
        let stage1 = self.writer.foreign_stage1.load(Relaxed);
        self.writer.foreign_stage2.store(stage1, Relaxed);
        // Acquire pairs with the consumer's Release publication, so once a
        // retired read reaches stage2 the slot it freed is safe to reuse.
        let observed = self.reader.code.load(Acquire);
        self.writer.foreign_stage1.store(observed, Relaxed);
    }

    /// Advance the consumer-domain barrier by one tick: the producer's code
    /// shifts one stage deeper. To be called once per consumer tick.
    pub fn consumer_step(&self) {
        let stage1 = self.reader.foreign_stage1.load(Relaxed);
        self.reader.foreign_stage2.store(stage1, Relaxed);
        let observed = self.writer.code.load(Acquire);
        self.reader.foreign_stage1.store(observed, Relaxed);
    }

    /// Producer-side view of the full predicate, exactly as `try_write`
    /// evaluates it.
    pub fn is_full(&self) -> bool {
        gray::full_from_codes(
            self.writer.code.load(Relaxed),
            self.writer.foreign_stage2.load(Relaxed),
            self.code_mask,
        )
    }

    /// Consumer-side view of the empty predicate, exactly as `try_read`
    /// evaluates it.
    pub fn is_empty(&self) -> bool {
        gray::empty_from_codes(
            self.reader.code.load(Relaxed),
            self.reader.foreign_stage2.load(Relaxed),
        )
    }

    /// Records resident as believed by the producer domain.
    ///
    /// Never an under-count: stale reader news can only inflate it, up to
    /// `capacity`. The handle layer admits batches against this.
    pub fn producer_len_hint(&self) -> usize {
        let pos = self.writer.pos.load(Relaxed);
        let believed_rd = gray::decode(self.writer.foreign_stage2.load(Relaxed));
        pos.wrapping_sub(believed_rd) & self.code_mask
    }

    /// Records resident as believed by the consumer domain. Never an
    /// over-count.
    pub fn consumer_len_hint(&self) -> usize {
        let pos = self.reader.pos.load(Relaxed);
        let believed_wr = gray::decode(self.reader.foreign_stage2.load(Relaxed));
        believed_wr.wrapping_sub(pos) & self.code_mask
    }

    /// Re-zero both position counters and all four stage registers.
    ///
    /// Record slots are NOT cleared; their contents are undefined until the
    /// next write and must not be read before one.
    ///
    /// # Safety
    /// Both domains must be quiesced: no `try_write`/`try_read`/step may be
    /// in flight on any thread. Resetting while a domain is mid-operation
    /// leaves the occupancy registers undefined and races the slot that
    /// operation was touching.
    pub unsafe fn reset(&self) {
        for regs in [&*self.writer, &*self.reader] {
            regs.pos.store(0, Relaxed);
            regs.code.store(0, Relaxed);
            regs.foreign_stage1.store(0, Relaxed);
            regs.foreign_stage2.store(0, Relaxed);
        }
    }
}

impl<T> fmt::Debug for GrayFifo<T> {
    /// Shows both domains' registers without touching record slots.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrayFifo")
            .field("capacity", &self.capacity)
            .field("wr_pos", &self.writer.pos.load(Relaxed))
            .field("wr_code", &self.writer.code.load(Relaxed))
            .field("rd_pos", &self.reader.pos.load(Relaxed))
            .field("rd_code", &self.reader.code.load(Relaxed))
            .finish_non_exhaustive()
    }
}
