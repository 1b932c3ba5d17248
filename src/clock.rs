// contact-deck/src/clock.rs

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 { chrono::Utc::now().timestamp_millis() }
}

/// Settable clock for deterministic callers and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self { Self { now: AtomicI64::new(now_ms) } }
    pub fn set(&self, now_ms: i64) { self.now.store(now_ms, Ordering::SeqCst); }
    pub fn advance(&self, delta_ms: i64) { self.now.fetch_add(delta_ms, Ordering::SeqCst); }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 { self.now.load(Ordering::SeqCst) }
}
