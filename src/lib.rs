#![cfg_attr(not(test), no_std)]

// This must go FIRST so that all the other modules see its macros.
mod fmt;

pub mod time;

pub mod counter;

pub mod interrupt;

pub mod debug;

pub mod port;

pub mod debounce;

pub mod press;

pub mod blink;

pub mod report;

pub mod config;

pub mod control;

pub use crate::blink::{BlinkController, Phase};
pub use crate::config::{Config, Error, Mode};
pub use crate::control::ControlLoop;
pub use crate::counter::{Direction, SoftTicks};
pub use crate::debounce::{Debouncer, Edge, Polarity};
pub use crate::port::{DigitalPort, Layout, PinBank, Shadowed};
pub use crate::press::PressTimer;
pub use crate::report::{Console, Labels, Report, WriteReport};
pub use crate::time::{FreeRunning, Hertz, Tick, TimeSource, Wide};

/// Build the default two-button loop: button 0 timed, button 1 cancels,
/// durations reported on the debug console.
///
/// Returns an error only if the compile-time configuration is unusable.
pub fn init<T: TimeSource, P: DigitalPort>(time: T, port: P) -> Result<ControlLoop<T, P, Console, 2>, Error> {
    ControlLoop::new(Config::default(), time, port, Console::default())
}
