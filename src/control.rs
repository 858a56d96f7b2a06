//! Control loop driver.
//!
//! One [`ControlLoop::poll`] call is one loop iteration:
//! 1. read the time source once
//! 2. read the port once
//! 3. debounce every button against that single `now`
//! 4. route stable edges to the press timers and the blink cancel input
//! 5. let the blink controller toggle if its period has elapsed
//!
//! Output changes are written immediately through the port shadow. Nothing
//! here waits, so the loop can be spun as fast as the core allows.

use crate::blink::{BlinkController, Phase};
use crate::config::{Config, Error, Mode};
use crate::debounce::{Debouncer, Edge};
use crate::port::{DigitalPort, Shadowed};
use crate::press::PressTimer;
use crate::report::Report;
use crate::time::{Tick, TimeSource};

/// The button state machines for `N` buttons, plus the blink controller,
/// bound to a time source, a port and a report sink.
pub struct ControlLoop<T, P, R, const N: usize> {
    config: Config,
    time: T,
    port: Shadowed<P>,
    reporter: R,
    buttons: [Debouncer; N],
    timers: [PressTimer; N],
    blink: BlinkController,
    led_mask: u32,
    pattern: u32,
}

impl<T, P, R, const N: usize> ControlLoop<T, P, R, N>
where
    T: TimeSource,
    P: DigitalPort,
    R: Report,
{
    /// Validate `config` and bring the port up: LED bits become outputs and
    /// are switched off, every other bit keeps its level. Debouncers are
    /// seeded from this first read, so a button held through reset does not
    /// count as a press.
    pub fn new(config: Config, time: T, port: P, reporter: R) -> Result<Self, Error> {
        config.validate(N)?;

        let layout = config.layout;
        let led_mask = layout.led_mask();

        let mut port = port;
        port.set_direction(led_mask);
        let mut port = Shadowed::new(port);
        port.write_field(led_mask, 0);

        let now = time.now();
        let levels = port.read();
        let window = config.debounce_ticks();
        let buttons = core::array::from_fn(|i| {
            Debouncer::seeded(window, config.polarity, levels & layout.button_mask(i) != 0, now)
        });
        let timers = core::array::from_fn(|_| PressTimer::new(config.ticks_per_ms()));

        info!(
            "control loop up: {} buttons, debounce {} ms, blink {} ms, threshold {} ms",
            N,
            config.debounce_ms,
            config.blink_period_ms,
            config.threshold_ms
        );

        Ok(Self {
            blink: BlinkController::new(config.blink_period_ticks(), config.threshold_ms),
            pattern: config.pattern_bits(),
            config,
            time,
            port,
            reporter,
            buttons,
            timers,
            led_mask,
        })
    }

    /// Run one iteration.
    pub fn poll(&mut self) {
        let now = self.time.now();
        let levels = self.port.read();

        for i in 0..N {
            let raw = levels & self.config.layout.button_mask(i) != 0;
            if let Some(edge) = self.buttons[i].update(raw, now) {
                trace!("button {} {} at {}", i, edge, now);
                self.on_edge(i, edge, now);
            }
        }

        if let Some(phase) = self.blink.poll(now) {
            trace!("blink toggle {} at {}", phase, now);
            self.drive(phase);
        }
    }

    /// Poll forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    fn on_edge(&mut self, button: usize, edge: Edge, now: Tick) {
        match self.config.mode {
            Mode::Dedicated { timed, cancel } => {
                if button == timed {
                    self.time_edge(button, edge, now);
                } else if button == cancel && edge == Edge::Pressed {
                    self.cancel(button);
                }
            }
            Mode::AnyButton => {
                if edge == Edge::Pressed && self.blink.is_armed() && self.blink.source() != Some(button) {
                    self.cancel(button);
                }
                self.time_edge(button, edge, now);
            }
        }
    }

    fn time_edge(&mut self, button: usize, edge: Edge, now: Tick) {
        let measuring = self.timers[button].is_measuring();
        match self.timers[button].on_edge(edge, now) {
            Some(ms) => {
                info!("button {} held {} ms", button, ms);
                self.reporter.duration(button, ms);
                if let Some(phase) = self.blink.on_duration(ms, button, now) {
                    info!("blink armed by button {}", button);
                    self.drive(phase);
                }
            }
            None if edge == Edge::Released && !measuring => {
                debug!("button {} released without a timed press", button);
            }
            None => {}
        }
    }

    fn cancel(&mut self, button: usize) {
        if let Some(phase) = self.blink.cancel() {
            info!("blink cancelled by button {}", button);
            self.drive(phase);
        }
    }

    fn drive(&mut self, phase: Phase) {
        let bits = if phase.is_on() { self.pattern } else { 0 };
        self.port.write_field(self.led_mask, bits);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn blink(&self) -> &BlinkController {
        &self.blink
    }

    pub fn button(&self, index: usize) -> &Debouncer {
        &self.buttons[index]
    }

    pub fn is_measuring(&self, index: usize) -> bool {
        self.timers[index].is_measuring()
    }

    /// Last word written to the port.
    pub fn output(&self) -> u32 {
        self.port.shadow()
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    pub fn port(&self) -> &P {
        self.port.port()
    }

    pub fn port_mut(&mut self) -> &mut P {
        self.port.port_mut()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }
}
