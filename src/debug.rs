//! Debug console.
//!
//! Provides `print!` and `println!` macros writing through a byte writer
//! installed by platform bring-up (typically a blocking UART transmit).
//! `\n` is expanded to `\r\n`.
//!
//! Until a writer is installed, print!/println! are no-ops.

use core::cell::Cell;
use core::fmt::{self, Write};

use critical_section::Mutex;

/// Byte writer used by the console.
pub type WriteByte = fn(u8);

static WRITER: Mutex<Cell<Option<WriteByte>>> = Mutex::new(Cell::new(None));

/// Debug print output
pub struct DebugPrint;

impl DebugPrint {
    /// Route console output to `write_byte`.
    ///
    /// Must be called after the output device is initialized.
    pub fn enable(write_byte: WriteByte) {
        critical_section::with(|cs| WRITER.borrow(cs).set(Some(write_byte)));
    }

    /// Drop console output from now on.
    pub fn disable() {
        critical_section::with(|cs| WRITER.borrow(cs).set(None));
    }

    pub fn is_enabled() -> bool {
        critical_section::with(|cs| WRITER.borrow(cs).get().is_some())
    }

    fn writer() -> Option<WriteByte> {
        critical_section::with(|cs| WRITER.borrow(cs).get())
    }
}

impl Write for DebugPrint {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let Some(write_byte) = DebugPrint::writer() else {
            return Ok(());
        };
        for byte in s.bytes() {
            if byte == b'\n' {
                write_byte(b'\r');
            }
            write_byte(byte);
        }
        Ok(())
    }
}

/// Print to the debug console
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        {
            use core::fmt::Write;
            let _ = write!(&mut $crate::debug::DebugPrint, $($arg)*);
        }
    }
}

/// Print with newline to the debug console
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {
        {
            use core::fmt::Write;
            let _ = writeln!(&mut $crate::debug::DebugPrint, $($arg)*);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    static OUT: StdMutex<Vec<u8>> = StdMutex::new(Vec::new());

    fn capture(byte: u8) {
        OUT.lock().unwrap().push(byte);
    }

    #[test]
    fn console_expands_newlines_once_enabled() {
        crate::print!("dropped\n");
        assert!(OUT.lock().unwrap().is_empty());

        DebugPrint::enable(capture);
        assert!(DebugPrint::is_enabled());
        crate::println!("BTN0: {} ms", 1200);
        DebugPrint::disable();
        crate::println!("dropped too");

        assert_eq!(OUT.lock().unwrap().as_slice(), b"BTN0: 1200 ms\r\n");
    }
}
