//! Loop configuration.
//!
//! Defaults come from compile-time constants generated by `build.rs`; set
//! `PRESS_BLINK_TICK_HZ`, `PRESS_BLINK_DEBOUNCE_MS`,
//! `PRESS_BLINK_BLINK_PERIOD_MS`, `PRESS_BLINK_THRESHOLD_MS` or
//! `PRESS_BLINK_ACTIVE_HIGH` at build time to change them.

use crate::debounce::Polarity;
use crate::port::Layout;
use crate::time::{Hertz, Tick};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/_config.rs"));
}

pub use generated::*;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Tick rate below 1 kHz, no whole tick per millisecond.
    TickRateTooLow,
    ZeroBlinkPeriod,
    /// Button or LED bits past bit 31.
    FieldOutOfRange,
    /// Button bits overlap LED bits.
    FieldsOverlap,
    /// Mode refers to a button the loop does not sample.
    ButtonOutOfRange,
    /// Timed and cancel button are the same.
    SameButton,
    /// Blink pattern selects no LED.
    EmptyPattern,
}

/// Which buttons are timed and which cancel the blink pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Only `timed` is measured; a press of `cancel` stops blinking.
    Dedicated { timed: usize, cancel: usize },
    /// Every button is measured; a press of any button other than the one
    /// that armed the pattern stops blinking.
    AnyButton,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Dedicated { timed: 0, cancel: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Rate of the time source.
    pub tick_rate: Hertz,
    pub debounce_ms: u64,
    /// Time between blink toggles.
    pub blink_period_ms: u64,
    /// Press duration that arms blinking.
    pub threshold_ms: u64,
    pub polarity: Polarity,
    pub layout: Layout,
    /// LEDs lit in the "on" phase, bit `i` = LED `i`.
    pub blink_pattern: u32,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Hertz(TICK_HZ),
            debounce_ms: DEBOUNCE_MS,
            blink_period_ms: BLINK_PERIOD_MS,
            threshold_ms: THRESHOLD_MS,
            polarity: Polarity::from_active_high(BUTTON_ACTIVE_HIGH),
            layout: Layout::default(),
            blink_pattern: 0b1111,
            mode: Mode::default(),
        }
    }
}

impl Config {
    pub fn ticks_per_ms(&self) -> u64 {
        self.tick_rate.ticks_per_ms()
    }

    pub fn debounce_ticks(&self) -> Tick {
        self.tick_rate.ms_to_ticks(self.debounce_ms)
    }

    pub fn blink_period_ticks(&self) -> Tick {
        self.tick_rate.ms_to_ticks(self.blink_period_ms)
    }

    /// Port bits driven in the blink "on" phase.
    pub fn pattern_bits(&self) -> u32 {
        self.layout.led_bits(self.blink_pattern)
    }

    /// Check the configuration for a loop sampling `buttons` buttons.
    pub fn validate(&self, buttons: usize) -> Result<(), Error> {
        if self.ticks_per_ms() == 0 {
            return Err(Error::TickRateTooLow);
        }
        if self.blink_period_ms == 0 {
            return Err(Error::ZeroBlinkPeriod);
        }
        if !self.layout.buttons_fit(buttons) || !self.layout.leds_fit() {
            return Err(Error::FieldOutOfRange);
        }
        if self.layout.buttons_mask(buttons) & self.layout.led_mask() != 0 {
            return Err(Error::FieldsOverlap);
        }
        if self.pattern_bits() == 0 {
            return Err(Error::EmptyPattern);
        }
        if let Mode::Dedicated { timed, cancel } = self.mode {
            if timed >= buttons || cancel >= buttons {
                return Err(Error::ButtonOutOfRange);
            }
            if timed == cancel {
                return Err(Error::SameButton);
            }
        }
        Ok(())
    }
}
