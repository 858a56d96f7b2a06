//! Time-windowed button debouncer.
//!
//! A raw level is accepted as the new stable level once it has been sampled
//! unchanged for at least the debounce window. Every accepted transition
//! produces exactly one [`Edge`]; bouncing inside the window produces none.

use crate::time::{elapsed, Tick};

/// Which raw level means "pressed". Fixed by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub const fn from_active_high(active_high: bool) -> Self {
        if active_high {
            Self::ActiveHigh
        } else {
            Self::ActiveLow
        }
    }

    /// Raw level of a pressed button.
    pub const fn active_level(self) -> bool {
        matches!(self, Self::ActiveHigh)
    }
}

/// Stable level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounce state of one button.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Last sampled raw level.
    raw: bool,
    /// Debounced level.
    stable: bool,
    /// Tick at which `raw` last changed.
    last_change: Tick,
    window: Tick,
    polarity: Polarity,
}

impl Debouncer {
    /// Starts released at tick 0.
    pub const fn new(window: Tick, polarity: Polarity) -> Self {
        let idle = !polarity.active_level();
        Self {
            raw: idle,
            stable: idle,
            last_change: 0,
            window,
            polarity,
        }
    }

    /// Starts with `level` already accepted as stable, e.g. the first port
    /// read after reset. A button held at reset then yields no `Pressed`.
    pub const fn seeded(window: Tick, polarity: Polarity, level: bool, now: Tick) -> Self {
        Self {
            raw: level,
            stable: level,
            last_change: now,
            window,
            polarity,
        }
    }

    /// Feed one raw sample taken at `now`.
    pub fn update(&mut self, raw: bool, now: Tick) -> Option<Edge> {
        if raw != self.raw {
            self.raw = raw;
            self.last_change = now;
        }

        if self.raw == self.stable || elapsed(self.last_change, now) < self.window {
            return None;
        }

        self.stable = self.raw;
        if self.stable == self.polarity.active_level() {
            Some(Edge::Pressed)
        } else {
            Some(Edge::Released)
        }
    }

    /// Debounced level.
    pub fn stable_level(&self) -> bool {
        self.stable
    }

    /// Last raw sample.
    pub fn raw_level(&self) -> bool {
        self.raw
    }

    pub fn last_change(&self) -> Tick {
        self.last_change
    }

    pub fn is_pressed(&self) -> bool {
        self.stable == self.polarity.active_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Tick = 20;

    #[test]
    fn stable_press_fires_once_after_window() {
        let mut d = Debouncer::new(WINDOW, Polarity::ActiveHigh);
        assert_eq!(d.update(true, 100), None);
        assert_eq!(d.update(true, 119), None);
        assert_eq!(d.update(true, 120), Some(Edge::Pressed));
        assert!(d.is_pressed());
        assert_eq!(d.update(true, 121), None);
        assert_eq!(d.update(true, 500), None);
    }

    #[test]
    fn bounce_restarts_window() {
        let mut d = Debouncer::new(WINDOW, Polarity::ActiveHigh);
        // 15 ticks of chatter, the last one lands high at tick 114
        for t in 100..115 {
            assert_eq!(d.update(t % 2 == 0, t), None);
        }
        assert_eq!(d.update(true, 115), None);
        assert_eq!(d.update(true, 133), None);
        assert_eq!(d.update(true, 134), Some(Edge::Pressed));
    }

    #[test]
    fn glitch_shorter_than_window_is_ignored() {
        let mut d = Debouncer::new(WINDOW, Polarity::ActiveHigh);
        assert_eq!(d.update(true, 10), None);
        assert_eq!(d.update(false, 15), None);
        assert_eq!(d.update(false, 100), None);
        assert!(!d.is_pressed());
    }

    #[test]
    fn release_edge_after_press() {
        let mut d = Debouncer::new(WINDOW, Polarity::ActiveHigh);
        d.update(true, 0);
        assert_eq!(d.update(true, 20), Some(Edge::Pressed));
        assert_eq!(d.update(false, 50), None);
        assert_eq!(d.update(false, 70), Some(Edge::Released));
        assert!(!d.is_pressed());
    }

    #[test]
    fn active_low_inverts_levels() {
        let mut d = Debouncer::new(WINDOW, Polarity::ActiveLow);
        assert!(d.stable_level());
        assert_eq!(d.update(true, 0), None);
        assert_eq!(d.update(false, 5), None);
        assert_eq!(d.update(false, 25), Some(Edge::Pressed));
        assert_eq!(d.update(true, 30), None);
        assert_eq!(d.update(true, 50), Some(Edge::Released));
    }

    #[test]
    fn seeded_pressed_button_emits_release_only() {
        let mut d = Debouncer::seeded(WINDOW, Polarity::ActiveHigh, true, 1_000);
        assert!(d.is_pressed());
        assert_eq!(d.update(true, 2_000), None);
        assert_eq!(d.update(false, 2_010), None);
        assert_eq!(d.update(false, 2_030), Some(Edge::Released));
    }

    #[test]
    fn zero_window_accepts_immediately() {
        let mut d = Debouncer::new(0, Polarity::ActiveHigh);
        assert_eq!(d.update(true, 7), Some(Edge::Pressed));
        assert_eq!(d.update(false, 7), Some(Edge::Released));
    }
}
