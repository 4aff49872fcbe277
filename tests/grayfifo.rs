use cdx_grayfifo::SPSC::Buffer::GrayFifo;
use std::io::ErrorKind;

// Two ticks carry a fresh foreign code through the two-stage barrier.
fn settle_consumer(fifo: &GrayFifo<u32>) {
    fifo.consumer_step();
    fifo.consumer_step();
}

fn settle_producer(fifo: &GrayFifo<u32>) {
    fifo.producer_step();
    fifo.producer_step();
}

#[test]
fn simple_write_read() {
    let fifo = GrayFifo::with_capacity(16).unwrap();

    assert!(fifo.try_write(42));
    settle_consumer(&fifo);
    assert_eq!(fifo.try_read(), Some(42));
    assert!(fifo.is_empty());
}

#[test]
fn invalid_capacities_rejected() {
    for capacity in [0usize, 1, 3, 6, 100] {
        let err = GrayFifo::<u32>::with_capacity(capacity).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "capacity {}", capacity);
    }
    assert!(GrayFifo::<u32>::with_capacity(2).is_ok());
}

#[test]
fn read_on_empty_is_a_no_op() {
    let fifo = GrayFifo::with_capacity(4).unwrap();

    assert_eq!(fifo.try_read(), None);
    settle_consumer(&fifo);
    assert_eq!(fifo.try_read(), None);

    // The refused reads left rd_pos alone: the next record lands at slot 0
    // and still comes out first.
    assert!(fifo.try_write(7));
    settle_consumer(&fifo);
    assert_eq!(fifo.try_read(), Some(7));
}

#[test]
fn full_buffer_rejects_fifth_write() {
    let fifo = GrayFifo::with_capacity(4).unwrap();

    // No steps or reads: the producer's belief of the reader is exact, so
    // four writes fill the ring.
    for i in 0..4u32 {
        assert!(!fifo.is_full());
        assert!(fifo.try_write(i));
    }
    assert!(fifo.is_full());

    // Rejected, nothing disturbed.
    assert!(!fifo.try_write(99));
    assert!(fifo.is_full());

    settle_consumer(&fifo);
    for i in 0..4u32 {
        assert_eq!(fifo.try_read(), Some(i));
    }
    assert_eq!(fifo.try_read(), None);

    // The producer only un-fulls once the reader's code crosses back.
    assert!(fifo.is_full());
    settle_producer(&fifo);
    assert!(!fifo.is_full());
    assert!(fifo.try_write(5));
}

#[test]
fn write_invisible_until_two_consumer_ticks() {
    let fifo = GrayFifo::with_capacity(8).unwrap();

    assert!(fifo.try_write(1));
    // Stale belief: the record is resident but not yet trusted.
    assert!(fifo.is_empty());
    assert_eq!(fifo.try_read(), None);

    fifo.consumer_step();
    // One tick: the sample sits in stage1, the belief is unchanged.
    assert!(fifo.is_empty());
    assert_eq!(fifo.try_read(), None);

    fifo.consumer_step();
    assert!(!fifo.is_empty());
    assert_eq!(fifo.try_read(), Some(1));
}

#[test]
fn wraparound_past_counter_modulus() {
    let fifo = GrayFifo::with_capacity(4).unwrap();

    // W = 3 bits, counter modulus 8: 100 round trips cross it repeatedly.
    for round in 0..100u32 {
        assert!(fifo.try_write(round));
        settle_consumer(&fifo);
        assert_eq!(fifo.try_read(), Some(round));
        assert!(fifo.is_empty());
        settle_producer(&fifo);
        assert!(!fifo.is_full());
    }
}

#[test]
fn reset_restores_empty_from_any_state() {
    let fifo = GrayFifo::with_capacity(4).unwrap();

    for i in 0..3u32 {
        assert!(fifo.try_write(i));
    }
    settle_consumer(&fifo);
    assert_eq!(fifo.try_read(), Some(0));
    settle_producer(&fifo);

    // Both domains are idle here, so reset is allowed.
    unsafe { fifo.reset() };

    assert!(fifo.is_empty());
    assert!(!fifo.is_full());
    assert_eq!(fifo.try_read(), None);
    assert_eq!(fifo.producer_len_hint(), 0);
    assert_eq!(fifo.consumer_len_hint(), 0);

    // Fresh round trip after reset.
    assert!(fifo.try_write(9));
    settle_consumer(&fifo);
    assert_eq!(fifo.try_read(), Some(9));
}

#[test]
fn len_hints_stay_pessimistic() {
    let fifo = GrayFifo::with_capacity(8).unwrap();

    for i in 0..5u32 {
        assert!(fifo.try_write(i));
    }
    // Producer belief is exact here: the reader never moved.
    assert_eq!(fifo.producer_len_hint(), 5);
    // The consumer has seen nothing cross yet.
    assert_eq!(fifo.consumer_len_hint(), 0);

    settle_consumer(&fifo);
    assert_eq!(fifo.consumer_len_hint(), 5);

    assert_eq!(fifo.try_read(), Some(0));
    assert_eq!(fifo.try_read(), Some(1));
    // The producer has not heard about the reads yet.
    assert_eq!(fifo.producer_len_hint(), 5);
    settle_producer(&fifo);
    assert_eq!(fifo.producer_len_hint(), 3);
}

#[test]
fn random_interleaving_preserves_fifo_order() {
    fastrand::seed(0x5eed);

    let fifo = GrayFifo::with_capacity(8).unwrap();
    let mut next_in = 0u32;
    let mut next_out = 0u32;
    const TOTAL: u32 = 10_000;

    while next_out < TOTAL {
        match fastrand::u8(0..4) {
            0 => {
                if next_in < TOTAL && fifo.try_write(next_in) {
                    next_in += 1;
                }
            }
            1 => {
                if let Some(v) = fifo.try_read() {
                    assert_eq!(v, next_out);
                    next_out += 1;
                }
            }
            2 => fifo.producer_step(),
            _ => fifo.consumer_step(),
        }
    }
    assert_eq!(next_in, TOTAL);
}
