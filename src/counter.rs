//! Interrupt-fed software tick counter.
//!
//! A periodic timer interrupt advances the counter once per period; the
//! control loop only reads it. The count is a single
//! [`portable_atomic::AtomicU64`], so a read racing the handler never
//! observes half of an update, even on cores without native 64-bit atomics
//! (portable-atomic falls back to a critical section there).

use portable_atomic::{AtomicU64, Ordering};

use crate::time::{Tick, TimeSource};

/// Which way the handler moves the raw count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Starts at zero and increments on every interrupt, stopping at `u64::MAX`.
    Up,
    /// Starts at `u64::MAX` and decrements, stopping at zero.
    Down,
}

/// Tick counter owned by a timer interrupt.
///
/// The handler advances it ([`SoftTicks::on_interrupt`]). Readers get
/// elapsed time through [`TimeSource::now`], which is non-decreasing for
/// both directions: the count saturates instead of wrapping.
pub struct SoftTicks {
    count: AtomicU64,
    direction: Direction,
    ticks_per_interrupt: u64,
}

impl SoftTicks {
    /// `ticks_per_interrupt` is the timer period programmed into the
    /// hardware, so `now` stays in the same tick unit as a free-running
    /// source (10 000 for a 1 ms period at 10 MHz).
    pub const fn new(direction: Direction, ticks_per_interrupt: u64) -> Self {
        let start = match direction {
            Direction::Up => 0,
            Direction::Down => u64::MAX,
        };
        Self {
            count: AtomicU64::new(start),
            direction,
            ticks_per_interrupt,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance by one interrupt period.
    ///
    /// Meant to be called from the timer interrupt handler. The update is a
    /// single read-modify-write, so a second caller cannot lose a period.
    #[inline]
    pub fn on_interrupt(&self) {
        let direction = self.direction;
        let _ = self.count.fetch_update(Ordering::AcqRel, Ordering::Relaxed, |count| {
            Some(match direction {
                Direction::Up => count.saturating_add(1),
                Direction::Down => count.saturating_sub(1),
            })
        });
    }

    /// Raw counter value as the handler left it.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Interrupt periods elapsed since start.
    #[inline]
    pub fn periods(&self) -> u64 {
        match self.direction {
            Direction::Up => self.count(),
            Direction::Down => u64::MAX - self.count(),
        }
    }
}

impl TimeSource for SoftTicks {
    #[inline]
    fn now(&self) -> Tick {
        self.periods().saturating_mul(self.ticks_per_interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_counter_scales_to_ticks() {
        let ticks = SoftTicks::new(Direction::Up, 10_000);
        assert_eq!(ticks.now(), 0);
        for _ in 0..3 {
            ticks.on_interrupt();
        }
        assert_eq!(ticks.count(), 3);
        assert_eq!(ticks.now(), 30_000);
    }

    #[test]
    fn down_counter_reports_elapsed_time() {
        let ticks = SoftTicks::new(Direction::Down, 1);
        assert_eq!(ticks.count(), u64::MAX);
        ticks.on_interrupt();
        ticks.on_interrupt();
        assert_eq!(ticks.count(), u64::MAX - 2);
        assert_eq!(ticks.periods(), 2);
        assert_eq!(ticks.now(), 2);
    }

    #[test]
    fn down_counter_stops_at_zero() {
        let ticks = SoftTicks {
            count: AtomicU64::new(1),
            direction: Direction::Down,
            ticks_per_interrupt: 1,
        };
        ticks.on_interrupt();
        ticks.on_interrupt();
        assert_eq!(ticks.count(), 0);
        assert_eq!(ticks.now(), u64::MAX);
    }

    #[test]
    fn up_counter_stops_at_max() {
        let ticks = SoftTicks {
            count: AtomicU64::new(u64::MAX - 1),
            direction: Direction::Up,
            ticks_per_interrupt: 1,
        };
        let before = ticks.now();
        ticks.on_interrupt();
        ticks.on_interrupt();
        assert_eq!(ticks.count(), u64::MAX);
        assert!(ticks.now() >= before);
    }

    #[test]
    fn concurrent_writers_lose_no_periods() {
        let ticks = SoftTicks::new(Direction::Up, 1);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10_000 {
                        ticks.on_interrupt();
                    }
                });
            }
        });
        assert_eq!(ticks.count(), 40_000);
    }

    #[test]
    fn now_is_monotonic() {
        let ticks = SoftTicks::new(Direction::Down, 10_000);
        let mut last = ticks.now();
        for _ in 0..100 {
            ticks.on_interrupt();
            let now = ticks.now();
            assert!(now >= last);
            last = now;
        }
    }
}
