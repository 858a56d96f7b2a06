//! Tick arithmetic and free-running time sources.
//!
//! Every duration in the crate is kept in ticks of a fixed-rate counter and
//! only converted to milliseconds (integer division by
//! [`Hertz::ticks_per_ms`]) when it is reported.
//!
//! Two synchronous sources live here:
//! - [`FreeRunning`] - a 64-bit counter register, read as is
//! - [`Wide`] - a 32-bit counter register widened to 64 bits
//!
//! The interrupt-fed source is [`crate::counter::SoftTicks`].

use core::cell::Cell;

/// Count of ticks since reset.
pub type Tick = u64;

/// Hertz
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u32);

impl Hertz {
    pub const fn hz(hz: u32) -> Self {
        Self(hz)
    }

    pub const fn khz(khz: u32) -> Self {
        Self(khz * 1_000)
    }

    pub const fn mhz(mhz: u32) -> Self {
        Self(mhz * 1_000_000)
    }

    /// Ticks per millisecond, truncated. Zero below 1 kHz.
    pub const fn ticks_per_ms(self) -> u64 {
        self.0 as u64 / 1_000
    }

    /// `ms` milliseconds expressed in ticks of this rate.
    pub const fn ms_to_ticks(self, ms: u64) -> Tick {
        ms.saturating_mul(self.ticks_per_ms())
    }
}

/// Ticks elapsed from `earlier` to `later`, clamped to zero when `later`
/// precedes `earlier`.
#[inline]
pub const fn elapsed(earlier: Tick, later: Tick) -> Tick {
    later.saturating_sub(earlier)
}

/// A monotonic tick counter advancing at a known fixed rate.
///
/// Reads never block. Values observed by one reader are non-decreasing.
pub trait TimeSource {
    /// Current tick count.
    fn now(&self) -> Tick;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    #[inline]
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// 64-bit free-running counter read synchronously, e.g. `mtime` or a
/// `get_ticks_from_reset()` style platform call.
pub struct FreeRunning<F> {
    read: F,
}

impl<F: Fn() -> u64> FreeRunning<F> {
    pub const fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F: Fn() -> u64> TimeSource for FreeRunning<F> {
    #[inline]
    fn now(&self) -> Tick {
        (self.read)()
    }
}

/// 32-bit free-running counter extended to 64 bits.
///
/// Wraps are detected by comparing against the previous reading, so the
/// counter has to be read at least once per wrap period (about 429 s at
/// 10 MHz). The extension state is only touched inside a critical section,
/// which makes `now` callable from both thread and interrupt context.
pub struct Wide<F> {
    read: F,
    // handles 32-bit overflow
    last_count: Cell<u32>,
    high_bits: Cell<u32>,
}

// The cells are only accessed inside a critical section.
unsafe impl<F: Sync> Sync for Wide<F> {}

impl<F: Fn() -> u32> Wide<F> {
    pub const fn new(read: F) -> Self {
        Self {
            read,
            last_count: Cell::new(0),
            high_bits: Cell::new(0),
        }
    }
}

impl<F: Fn() -> u32> TimeSource for Wide<F> {
    fn now(&self) -> Tick {
        critical_section::with(|_cs| {
            let count = (self.read)();
            let last = self.last_count.get();

            // current value below the previous one means the register wrapped
            if count < last {
                self.high_bits.set(self.high_bits.get().wrapping_add(1));
            }
            self.last_count.set(count);

            ((self.high_bits.get() as u64) << 32) | (count as u64)
        })
    }
}
