//! Press-duration reports.
//!
//! One line per completed measurement, formatted `<label>: <N> ms`.

use core::fmt::{self, Write};

/// Receiver of completed press durations. Fire-and-forget.
pub trait Report {
    fn duration(&mut self, button: usize, ms: u64);
}

/// Discards reports.
impl Report for () {
    fn duration(&mut self, _button: usize, _ms: u64) {}
}

impl<R: Report + ?Sized> Report for &mut R {
    fn duration(&mut self, button: usize, ms: u64) {
        (**self).duration(button, ms)
    }
}

/// Label of each button, indexed by button number. Buttons without an
/// entry are printed as `BTN<i>`.
#[derive(Debug, Clone, Copy)]
pub struct Labels(pub &'static [&'static str]);

impl Default for Labels {
    fn default() -> Self {
        Labels(&[])
    }
}

impl Labels {
    /// Write one report line, including the trailing newline.
    pub fn write_line<W: Write + ?Sized>(&self, w: &mut W, button: usize, ms: u64) -> fmt::Result {
        match self.0.get(button) {
            Some(label) => writeln!(w, "{}: {} ms", label, ms),
            None => writeln!(w, "BTN{}: {} ms", button, ms),
        }
    }
}

/// Reports on the debug console ([`crate::println!`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    labels: Labels,
}

impl Console {
    pub const fn new(labels: Labels) -> Self {
        Self { labels }
    }
}

impl Report for Console {
    fn duration(&mut self, button: usize, ms: u64) {
        let _ = self.labels.write_line(&mut crate::debug::DebugPrint, button, ms);
    }
}

/// Reports into any [`core::fmt::Write`] sink.
pub struct WriteReport<W> {
    writer: W,
    labels: Labels,
}

impl<W: Write> WriteReport<W> {
    pub fn new(writer: W, labels: Labels) -> Self {
        Self { writer, labels }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn release(self) -> W {
        self.writer
    }
}

impl<W: Write> Report for WriteReport<W> {
    fn duration(&mut self, button: usize, ms: u64) {
        if self.labels.write_line(&mut self.writer, button, ms).is_err() {
            warn!("report for button {} dropped", button);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels_use_button_index() {
        let mut r = WriteReport::new(String::new(), Labels::default());
        r.duration(0, 1200);
        r.duration(1, 0);
        assert_eq!(r.writer(), "BTN0: 1200 ms\nBTN1: 0 ms\n");
    }

    #[test]
    fn custom_labels_fall_back_past_table() {
        let mut r = WriteReport::new(String::new(), Labels(&["Pulsador 0"]));
        r.duration(0, 400);
        r.duration(3, 17);
        assert_eq!(r.release(), "Pulsador 0: 400 ms\nBTN3: 17 ms\n");
    }

    struct Full;

    impl Write for Full {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn failing_writer_is_not_fatal() {
        let mut r = WriteReport::new(Full, Labels::default());
        r.duration(0, 5);
    }
}
