// This is the shared hand-off buffer - one writer domain, one reader domain

use crate::SPSC::Structs::Buffer_Structs::DomainRegs;

use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;

/// A bounded hand-off fifo between two independently progressing execution
/// domains (two threads, an interrupt and a task, two polled contexts) that
/// share no lock.
///
/// ### Synchronization design:
/// - Each domain owns one W-bit position counter and advances only that.
///   W is one bit wider than the slot index, which keeps a full ring and an
///   empty ring distinguishable.
/// - Counters cross the domain boundary Gray-encoded: an increment moves
///   exactly one bit, so a foreign sample taken mid-transition is either the
///   old value or the new one.
/// - Each domain shifts the foreign code through two stage registers, once
///   per its own tick (`producer_step`/`consumer_step`), and decides
///   occupancy against the second stage only. The belief is stale but only
///   ever pessimistic: full/empty may be reported early, never late.
///
/// At most one thread may act as the producer domain (`try_write`,
/// `producer_step`, `is_full`) and one as the consumer domain (`try_read`,
/// `consumer_step`, `is_empty`) at any time. The `Producer`/`Consumer`
/// handle split enforces this; direct users must uphold it themselves.
pub struct GrayFifo<T> {
    /// Record slots. A slot is written only by the producer domain and read
    /// only by the consumer domain, never both at once while the occupancy
    /// discipline holds.
    pub(crate) slots: Box<[UnsafeCell<MaybeUninit<T>>]>,

    /// Number of slots; power of two, at least 2.
    pub(crate) capacity: usize,

    /// `capacity - 1`, wraps positions onto slot indexes.
    pub(crate) mask: usize,

    /// `2 * capacity - 1`, wraps the W-bit position counters.
    pub(crate) code_mask: usize,

    /// Producer-domain registers. Padded so the two domains never share a
    /// cache line.
    pub(crate) writer: CachePadded<DomainRegs>,

    /// Consumer-domain registers.
    pub(crate) reader: CachePadded<DomainRegs>,
}

unsafe impl<T: Send> Send for GrayFifo<T> {}
unsafe impl<T: Send> Sync for GrayFifo<T> {}
