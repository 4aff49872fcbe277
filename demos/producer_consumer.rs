// In demos/producer_consumer.rs
// Two threads share a split fifo channel: the producer streams SHA-256
// digests, the consumer recomputes and verifies each one in order.
use cdx_grayfifo::SPSC::FifoBuilder;
use sha2::{Digest, Sha256};
use std::env;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

type Record = [u8; 32];

fn digest_for(i: u64) -> Record {
    let mut hasher = Sha256::new();
    hasher.update(format!("record_{}", i).as_bytes());
    hasher.finalize().into()
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let num_records: u64 = args
        .get(1)
        .map(|s| s.parse().expect("Invalid number of records"))
        .unwrap_or(1_000_000);

    let (producer, consumer) = FifoBuilder::new().with_capacity(1024).build::<Record>()?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_handler = Arc::clone(&stop);

    // Handle Ctrl+C to wind down cleanly.
    ctrlc::set_handler(move || {
        stop_for_handler.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Producer: sending {} digests...", num_records);
    let start = std::time::Instant::now();

    let p = thread::spawn(move || -> std::io::Result<u64> {
        let mut sent = 0u64;
        while sent < num_records && !stop.load(Ordering::Relaxed) {
            match producer.send(digest_for(sent)) {
                Ok(()) => sent += 1,
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::yield_now(),
                Err(e) => return Err(e),
            }
        }
        Ok(sent)
        // The producer handle drops here, which ends the consumer's stream.
    });

    let c = thread::spawn(move || -> std::io::Result<u64> {
        let mut verified = 0u64;
        loop {
            match consumer.receive() {
                Ok(Some(digest)) => {
                    assert_eq!(digest, digest_for(verified), "digest {} mismatched", verified);
                    verified += 1;
                }
                Ok(None) => thread::yield_now(),
                Err(e) if e.kind() == ErrorKind::BrokenPipe => break,
                Err(e) => return Err(e),
            }
        }
        Ok(verified)
    });

    let sent = p.join().expect("producer thread panicked")?;
    let verified = c.join().expect("consumer thread panicked")?;
    let elapsed = start.elapsed();

    println!(
        "Done: sent {}, verified {} in {:.2?} ({:.0} records/sec)",
        sent,
        verified,
        elapsed,
        verified as f64 / elapsed.as_secs_f64()
    );
    if sent != verified {
        eprintln!("WARNING: sent {} records but verified {}", sent, verified);
    }
    Ok(())
}
