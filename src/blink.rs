//! Non-blocking blink state machine.
//!
//! ```text
//!            duration >= threshold           (period elapsed: toggle)
//!   Idle ----------------------------> Armed <-----+
//!    ^                                   |  |      |
//!    +------------- cancel --------------+  +------+
//! ```
//!
//! Every method returns the output phase to drive when (and only when) the
//! output has to change; the caller writes it to the port.

use crate::time::{elapsed, Tick};

/// Output phase of the blink pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Off,
    On,
}

impl Phase {
    pub fn is_on(self) -> bool {
        self == Phase::On
    }

    fn toggled(self) -> Self {
        match self {
            Phase::Off => Phase::On,
            Phase::On => Phase::Off,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlinkController {
    armed: bool,
    phase: Phase,
    last_toggle: Tick,
    period: Tick,
    threshold_ms: u64,
    source: Option<usize>,
}

impl BlinkController {
    pub const fn new(period: Tick, threshold_ms: u64) -> Self {
        Self {
            armed: false,
            phase: Phase::Off,
            last_toggle: 0,
            period,
            threshold_ms,
            source: None,
        }
    }

    /// A press of `source` lasted `ms` milliseconds.
    ///
    /// Arms on a qualifying duration and switches the pattern on. Already
    /// armed: nothing changes, the running phase and timestamp are kept.
    pub fn on_duration(&mut self, ms: u64, source: usize, now: Tick) -> Option<Phase> {
        if ms < self.threshold_ms {
            return None;
        }
        if self.armed {
            debug!("already blinking, button {} re-arm ignored", source);
            return None;
        }

        self.armed = true;
        self.phase = Phase::On;
        self.last_toggle = now;
        self.source = Some(source);
        Some(Phase::On)
    }

    /// Toggle the pattern if a full period has passed since the last toggle.
    pub fn poll(&mut self, now: Tick) -> Option<Phase> {
        if !self.armed || elapsed(self.last_toggle, now) < self.period {
            return None;
        }

        self.phase = self.phase.toggled();
        self.last_toggle = now;
        Some(self.phase)
    }

    /// Disarm. The pattern goes off immediately regardless of phase.
    pub fn cancel(&mut self) -> Option<Phase> {
        if !self.armed {
            return None;
        }

        self.armed = false;
        self.phase = Phase::Off;
        self.source = None;
        Some(Phase::Off)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_toggle(&self) -> Tick {
        self.last_toggle
    }

    /// Button whose press armed the pattern.
    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }
}
