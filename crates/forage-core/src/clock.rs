//! Time sources for the gather resolver.
//!
//! Regeneration depends on wall-clock deltas, so the engine never reads the
//! system time inline. It asks an injected [`Clock`] for the current epoch
//! milliseconds. Two engines fed identical clocks resolve identically.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Advancing would move the clock past `u64::MAX` milliseconds.
    #[error("clock overflow: cannot advance {by_ms} ms from {now_ms} ms")]
    Overflow {
        /// The clock reading before the advance.
        now_ms: u64,
        /// The requested advance.
        by_ms: u64,
    },
}

/// Source of epoch-millisecond timestamps.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The system wall clock, read through `chrono`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-epoch system times read as 0.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Interior mutability lets a harness advance the clock while an engine
/// holds it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Clock reading `start_ms`.
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Move forward by `by_ms`. Returns the new reading.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if the reading would pass
    /// `u64::MAX`; the clock is left unchanged.
    pub fn advance(&self, by_ms: u64) -> Result<u64, ClockError> {
        let now_ms = self.now_ms.load(Ordering::Relaxed);
        let next = now_ms
            .checked_add(by_ms)
            .ok_or(ClockError::Overflow { now_ms, by_ms })?;
        self.now_ms.store(next, Ordering::Relaxed);
        Ok(next)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_and_sets() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        assert_eq!(clock.advance(500).unwrap(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn manual_clock_overflow_leaves_reading() {
        let clock = ManualClock::new(u64::MAX - 1);
        assert!(matches!(clock.advance(2), Err(ClockError::Overflow { .. })));
        assert_eq!(clock.now_ms(), u64::MAX - 1);
    }

    #[test]
    fn borrowed_clock_reads_through() {
        let clock = ManualClock::new(7);
        let by_ref: &ManualClock = &clock;
        assert_eq!(Clock::now_ms(&by_ref), 7);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
