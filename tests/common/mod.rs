#![allow(dead_code)]

use std::cell::Cell;

use press_blink::{Config, ControlLoop, DigitalPort, Hertz, Labels, Tick, TimeSource, WriteReport};

/// Ticks per millisecond of the observed hardware (10 MHz counter).
pub const TPM: u64 = 10_000;

pub const BTN0: u32 = 1 << 4;
pub const BTN1: u32 = 1 << 5;
pub const LEDS: u32 = 0x000F_0000;

/// Manually advanced time source.
pub struct Clock(pub Cell<Tick>);

impl Clock {
    pub fn new() -> Self {
        Clock(Cell::new(0))
    }

    pub fn advance(&self, ticks: Tick) {
        self.0.set(self.0.get() + ticks);
    }
}

impl TimeSource for Clock {
    fn now(&self) -> Tick {
        self.0.get()
    }
}

/// Port double: input bits come from `inputs`, output bits read back the
/// last written word.
#[derive(Default)]
pub struct Port {
    pub inputs: u32,
    pub outputs: u32,
    pub direction: u32,
    pub writes: Vec<u32>,
}

impl DigitalPort for Port {
    fn set_direction(&mut self, mask: u32) {
        self.direction = mask;
    }

    fn read(&mut self) -> u32 {
        (self.inputs & !self.direction) | (self.outputs & self.direction)
    }

    fn write(&mut self, value: u32) {
        self.outputs = value;
        self.writes.push(value);
    }
}

pub type Loop<'a, const N: usize> = ControlLoop<&'a Clock, Port, WriteReport<String>, N>;

pub fn config() -> Config {
    Config {
        tick_rate: Hertz::mhz(10),
        debounce_ms: 20,
        blink_period_ms: 500,
        threshold_ms: 1000,
        ..Config::default()
    }
}

pub fn new_loop<const N: usize>(config: Config, clock: &Clock, port: Port) -> Loop<'_, N> {
    ControlLoop::new(config, clock, port, WriteReport::new(String::new(), Labels::default())).unwrap()
}

pub fn leds_on<const N: usize>(lp: &Loop<'_, N>) -> bool {
    lp.port().outputs & LEDS == LEDS
}

pub fn leds_off<const N: usize>(lp: &Loop<'_, N>) -> bool {
    lp.port().outputs & LEDS == 0
}

/// Poll once per millisecond for `ms` milliseconds. Returns the LED
/// transitions seen as `(time in ms, on)`.
pub fn run_ms<const N: usize>(lp: &mut Loop<'_, N>, clock: &Clock, ms: u64) -> Vec<(u64, bool)> {
    let mut changes = Vec::new();
    let mut was_on = leds_on(lp);
    for _ in 0..ms {
        clock.advance(TPM);
        lp.poll();
        let on = leds_on(lp);
        if on != was_on {
            changes.push((clock.now() / TPM, on));
            was_on = on;
        }
    }
    changes
}

pub fn set_input<const N: usize>(lp: &mut Loop<'_, N>, mask: u32, pressed: bool) {
    let port = lp.port_mut();
    if pressed {
        port.inputs |= mask;
    } else {
        port.inputs &= !mask;
    }
}

pub fn report<'a, const N: usize>(lp: &'a Loop<'_, N>) -> &'a str {
    lp.reporter().writer().as_str()
}
