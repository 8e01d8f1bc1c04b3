//! Timer Hardware Abstraction Layer.
//!
//! This module defines the platform-independent trait for free-running
//! hardware counters and the busy-wait delay primitive built on them.

/// A free-running monotonic microsecond counter.
pub trait MonotonicTimer {
    /// Read the current counter value in microseconds.
    ///
    /// The count starts at an arbitrary epoch and never goes backwards.
    fn now_us(&self) -> u64;

    /// Busy-wait until the counter has advanced by at least `us`
    /// microseconds.
    ///
    /// If the counter reads back as exactly zero the delay returns
    /// immediately: some emulated environments do not implement the
    /// counter, and spinning on a stuck-at-zero register would never
    /// terminate. This is an escape hatch for that one case, not a
    /// general timing guarantee.
    fn delay_us(&self, us: u32) {
        let start = self.now_us();
        if start == 0 {
            return;
        }

        let target = start + us as u64;
        while self.now_us() < target {
            core::hint::spin_loop();
        }
    }

    /// Busy-wait delay for the specified number of milliseconds.
    fn delay_ms(&self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}
