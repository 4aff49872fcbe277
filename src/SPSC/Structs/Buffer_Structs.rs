// This is the per-domain register block of the dual-domain fifo

// atomics throughout; both domains' blocks live inside one shared value

use std::sync::atomic::AtomicUsize;

/// The four registers owned by one execution domain.
///
/// `#[repr(C)]` keeps field order and offsets defined so an external
/// monitor can sample a domain's registers at known positions.
#[repr(C)]
pub struct DomainRegs {
    /// Binary position counter, W bits wide (W = log2(capacity) + 1).
    /// Counts total records this domain has moved, mod 2^W. Advanced only
    /// by the owning domain.
    pub pos: AtomicUsize,

    /// Gray encoding of `pos`, recomputed on every advance. The only value
    /// the foreign domain ever samples.
    pub code: AtomicUsize,

    /// First barrier stage: the foreign code as last sampled by this
    /// domain's step.
    pub foreign_stage1: AtomicUsize,

    /// Second barrier stage: the sample before that. Occupancy decisions
    /// consult this register and nothing newer.
    pub foreign_stage2: AtomicUsize,
}

impl DomainRegs {
    pub(crate) fn new() -> Self {
        Self {
            pos: AtomicUsize::new(0),
            code: AtomicUsize::new(0),
            foreign_stage1: AtomicUsize::new(0),
            foreign_stage2: AtomicUsize::new(0),
        }
    }
}
