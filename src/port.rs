//! Digital I/O port access.
//!
//! The loop sees the board as one 32-bit port word:
//! - buttons on consecutive bits starting at [`Layout::button_shift`] (4-7 by default)
//! - LEDs on consecutive bits starting at [`Layout::led_shift`] (16-19 by default)
//!
//! Output writes always go through a [`Shadowed`] port so bits outside the
//! LED field keep whatever value they had.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};

/// A 32-bit digital port.
pub trait DigitalPort {
    /// Mark the bits in `mask` as outputs, the rest as inputs.
    fn set_direction(&mut self, mask: u32);

    /// Current input and output levels.
    fn read(&mut self) -> u32;

    /// Drive the output bits.
    fn write(&mut self, value: u32);
}

impl<P: DigitalPort + ?Sized> DigitalPort for &mut P {
    fn set_direction(&mut self, mask: u32) {
        (**self).set_direction(mask)
    }

    fn read(&mut self) -> u32 {
        (**self).read()
    }

    fn write(&mut self, value: u32) {
        (**self).write(value)
    }
}

/// Bit positions of buttons and LEDs in the port word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// Bit of button 0; button `i` sits at `button_shift + i`.
    pub button_shift: u8,
    /// Bit of LED 0; LED `i` sits at `led_shift + i`.
    pub led_shift: u8,
    /// Number of LEDs.
    pub led_count: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            button_shift: 4,
            led_shift: 16,
            led_count: 4,
        }
    }
}

impl Layout {
    /// Port bit of button `index`.
    pub const fn button_mask(&self, index: usize) -> u32 {
        match 1u32.checked_shl(self.button_shift as u32 + index as u32) {
            Some(bit) => bit,
            None => 0,
        }
    }

    /// Port bits of the first `count` buttons.
    pub const fn buttons_mask(&self, count: usize) -> u32 {
        field(self.button_shift as u32, count as u32)
    }

    /// Port bits of all LEDs.
    pub const fn led_mask(&self) -> u32 {
        field(self.led_shift as u32, self.led_count as u32)
    }

    /// Place an LED bit-set (bit `i` = LED `i`) into the port word.
    pub const fn led_bits(&self, pattern: u32) -> u32 {
        match pattern.checked_shl(self.led_shift as u32) {
            Some(bits) => bits & self.led_mask(),
            None => 0,
        }
    }

    pub(crate) const fn buttons_fit(&self, count: usize) -> bool {
        self.button_shift as usize + count <= 32
    }

    pub(crate) const fn leds_fit(&self) -> bool {
        self.led_shift as u32 + self.led_count as u32 <= 32
    }
}

const fn field(shift: u32, width: u32) -> u32 {
    if width == 0 || shift >= 32 {
        0
    } else if width >= 32 {
        u32::MAX << shift
    } else {
        ((1u32 << width) - 1) << shift
    }
}

/// A port together with a shadow of the last written word.
///
/// The shadow is seeded from one read of the port, then every update is a
/// read-modify-write on the shadow followed by a single port write.
pub struct Shadowed<P> {
    port: P,
    shadow: u32,
}

impl<P: DigitalPort> Shadowed<P> {
    pub fn new(mut port: P) -> Self {
        let shadow = port.read();
        Self { port, shadow }
    }

    /// Last value written (or read at construction).
    pub fn shadow(&self) -> u32 {
        self.shadow
    }

    pub fn read(&mut self) -> u32 {
        self.port.read()
    }

    pub fn set_direction(&mut self, mask: u32) {
        self.port.set_direction(mask);
    }

    /// Replace the bits inside `mask` with `bits` and write the whole word.
    pub fn write_field(&mut self, mask: u32, bits: u32) {
        self.shadow = (self.shadow & !mask) | (bits & mask);
        self.port.write(self.shadow);
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn release(self) -> P {
        self.port
    }
}

/// A [`DigitalPort`] assembled from individual `embedded-hal` pins.
///
/// Input `i` is reported at `button_shift + i`, output `i` is driven from
/// `led_shift + i`. Pin direction is fixed by the pin types, so
/// `set_direction` has nothing to configure.
pub struct PinBank<I, O, const NI: usize, const NO: usize> {
    inputs: [I; NI],
    outputs: [O; NO],
    layout: Layout,
    latched: u32,
}

impl<I, O, const NI: usize, const NO: usize> PinBank<I, O, NI, NO>
where
    I: InputPin<Error = Infallible>,
    O: OutputPin<Error = Infallible>,
{
    pub fn new(inputs: [I; NI], outputs: [O; NO], layout: Layout) -> Self {
        Self {
            inputs,
            outputs,
            layout,
            latched: 0,
        }
    }

    pub fn release(self) -> ([I; NI], [O; NO]) {
        (self.inputs, self.outputs)
    }
}

impl<I, O, const NI: usize, const NO: usize> DigitalPort for PinBank<I, O, NI, NO>
where
    I: InputPin<Error = Infallible>,
    O: OutputPin<Error = Infallible>,
{
    fn set_direction(&mut self, mask: u32) {
        trace!("pin bank direction mask {=u32:#x} fixed by pin types", mask);
    }

    fn read(&mut self) -> u32 {
        let mut value = self.latched;
        for (i, pin) in self.inputs.iter_mut().enumerate() {
            let bit = self.layout.button_mask(i);
            let high = match pin.is_high() {
                Ok(high) => high,
                Err(e) => match e {},
            };
            if high {
                value |= bit;
            } else {
                value &= !bit;
            }
        }
        value
    }

    fn write(&mut self, value: u32) {
        for (i, pin) in self.outputs.iter_mut().enumerate() {
            let bit = 1u32
                .checked_shl(self.layout.led_shift as u32 + i as u32)
                .unwrap_or(0);
            let result = if value & bit != 0 { pin.set_high() } else { pin.set_low() };
            if let Err(e) = result {
                match e {}
            }
        }
        self.latched = value & self.layout.led_mask();
    }
}
