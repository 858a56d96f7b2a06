//! Press-duration measurement.

use crate::debounce::Edge;
use crate::time::{elapsed, Tick};

/// Measures how long a button stays pressed.
///
/// A `Pressed` edge starts a measurement unless one is already running; the
/// matching `Released` edge completes it. A `Released` edge with nothing
/// running is dropped.
#[derive(Debug, Clone)]
pub struct PressTimer {
    press_tick: Option<Tick>,
    ticks_per_ms: u64,
}

impl PressTimer {
    pub const fn new(ticks_per_ms: u64) -> Self {
        Self {
            press_tick: None,
            ticks_per_ms,
        }
    }

    /// Feed a stable edge observed at `now`. Returns the held duration in
    /// milliseconds when a measurement completes.
    pub fn on_edge(&mut self, edge: Edge, now: Tick) -> Option<u64> {
        match edge {
            Edge::Pressed => {
                if self.press_tick.is_none() {
                    self.press_tick = Some(now);
                }
                None
            }
            Edge::Released => {
                let start = self.press_tick.take()?;
                Some(elapsed(start, now) / self.ticks_per_ms)
            }
        }
    }

    pub fn is_measuring(&self) -> bool {
        self.press_tick.is_some()
    }

    /// Tick of the press being timed.
    pub fn press_tick(&self) -> Option<Tick> {
        self.press_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKS_PER_MS: u64 = 10_000;

    #[test]
    fn press_release_reports_truncated_ms() {
        let mut t = PressTimer::new(TICKS_PER_MS);
        assert_eq!(t.on_edge(Edge::Pressed, 50_000), None);
        assert!(t.is_measuring());
        assert_eq!(t.on_edge(Edge::Released, 50_000 + 12_009_999), Some(1_200));
        assert!(!t.is_measuring());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut t = PressTimer::new(TICKS_PER_MS);
        assert_eq!(t.on_edge(Edge::Released, 1_000_000), None);
        assert!(!t.is_measuring());
    }

    #[test]
    fn repeated_press_keeps_first_timestamp() {
        let mut t = PressTimer::new(TICKS_PER_MS);
        t.on_edge(Edge::Pressed, 0);
        t.on_edge(Edge::Pressed, 3_000_000);
        assert_eq!(t.press_tick(), Some(0));
        assert_eq!(t.on_edge(Edge::Released, 4_000_000), Some(400));
    }

    #[test]
    fn backwards_time_clamps_to_zero() {
        let mut t = PressTimer::new(TICKS_PER_MS);
        t.on_edge(Edge::Pressed, 9_000_000);
        assert_eq!(t.on_edge(Edge::Released, 10), Some(0));
    }

    #[test]
    fn second_release_is_ignored() {
        let mut t = PressTimer::new(1);
        t.on_edge(Edge::Pressed, 10);
        assert_eq!(t.on_edge(Edge::Released, 15), Some(5));
        assert_eq!(t.on_edge(Edge::Released, 20), None);
    }
}
