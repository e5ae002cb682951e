//! `retrier demo` – simulated flaky operation.

use anyhow::Result;
use retrier_core::{retrier, PolicyDescriptor};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Fails `failures` times, then succeeds with the attempt number.
pub async fn run_demo(descriptor: PolicyDescriptor<String>, failures: u32) -> Result<()> {
    let attempts = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let subject = {
        let attempts = Arc::clone(&attempts);
        move || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let at_ms = start.elapsed().as_millis();
            async move {
                if n <= failures {
                    println!("  attempt {:>3} at {:>7} ms: failed", n, at_ms);
                    Err(format!("simulated failure #{}", n))
                } else {
                    println!("  attempt {:>3} at {:>7} ms: succeeded", n, at_ms);
                    Ok(n)
                }
            }
        }
    };

    match retrier(subject, descriptor)?.await {
        Ok(n) => {
            println!("Succeeded after {} attempt(s).", n);
            Ok(())
        }
        Err(reason) => anyhow::bail!(
            "gave up after {} attempt(s): {}",
            attempts.load(Ordering::SeqCst),
            reason
        ),
    }
}
