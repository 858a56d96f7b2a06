//! Timer interrupt wiring for the interrupt-fed tick counter.
//!
//! The platform owns the interrupt controller; this module only models the
//! three calls the loop needs from it ([`TimerInterrupt`]) and provides:
//! - [`start_tick_interrupt`] to issue them in order
//! - [`HandlerSlot`] as a dispatch target for bare trap entries
//! - [`bind_tick_counter!`](crate::bind_tick_counter) to declare a counter and its handler

use core::cell::Cell;
use core::sync::atomic::{compiler_fence, Ordering};

use critical_section::Mutex;

/// Interrupt handler function type
pub type Handler = fn();

/// Periodic timer interrupt provided by the platform.
pub trait TimerInterrupt {
    /// Register the function run on every timer interrupt.
    fn install_handler(&mut self, handler: Handler);

    /// Program the interrupt period in ticks of the timer clock.
    fn set_period(&mut self, ticks: u32);

    /// Unmask the timer interrupt and enable interrupts globally.
    ///
    /// # Safety
    /// Enabling interrupts can cause handlers to execute immediately.
    unsafe fn enable(&mut self);
}

/// Install `handler`, program `period_ticks` and enable the interrupt.
///
/// The handler is in place before the interrupt can fire.
///
/// # Safety
/// Enabling interrupts can cause handlers to execute immediately. Anything
/// `handler` touches must be initialized before calling this.
pub unsafe fn start_tick_interrupt<T: TimerInterrupt>(timer: &mut T, handler: Handler, period_ticks: u32) {
    timer.install_handler(handler);
    timer.set_period(period_ticks);
    compiler_fence(Ordering::SeqCst);
    timer.enable();
    debug!("tick interrupt enabled, period {} ticks", period_ticks);
}

/// Single-entry handler table.
///
/// For platforms whose trap entry just calls a Rust function: install the
/// handler here and call [`HandlerSlot::dispatch`] from the trap entry.
pub struct HandlerSlot {
    handler: Mutex<Cell<Option<Handler>>>,
}

impl HandlerSlot {
    pub const fn new() -> Self {
        Self {
            handler: Mutex::new(Cell::new(None)),
        }
    }

    /// Register the handler, replacing any previous one.
    pub fn set(&self, handler: Handler) {
        critical_section::with(|cs| self.handler.borrow(cs).set(Some(handler)));
    }

    /// Remove the handler.
    pub fn clear(&self) {
        critical_section::with(|cs| self.handler.borrow(cs).set(None));
    }

    pub fn is_set(&self) -> bool {
        critical_section::with(|cs| self.handler.borrow(cs).get().is_some())
    }

    /// Run the registered handler, if any.
    #[inline]
    pub fn dispatch(&self) {
        let handler = critical_section::with(|cs| self.handler.borrow(cs).get());
        if let Some(h) = handler {
            h();
        }
    }
}

impl Default for HandlerSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Declare a `static` [`SoftTicks`](crate::counter::SoftTicks) together with
/// the plain `fn()` handler that advances it.
///
/// ```ignore
/// press_blink::bind_tick_counter!(static TICKS: Up, 10_000; fn on_tick);
///
/// unsafe { start_tick_interrupt(&mut clint, on_tick, 10_000) };
/// let time = &TICKS;
/// ```
#[macro_export]
macro_rules! bind_tick_counter {
    ($vis:vis static $name:ident: $dir:ident, $ticks_per_irq:expr; fn $handler:ident) => {
        $vis static $name: $crate::counter::SoftTicks =
            $crate::counter::SoftTicks::new($crate::counter::Direction::$dir, $ticks_per_irq);

        /// Timer interrupt handler advancing the bound tick counter.
        $vis fn $handler() {
            $name.on_interrupt();
        }
    };
}
