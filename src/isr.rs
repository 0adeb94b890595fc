//! Process-wide singleton cell for sharing one [`Dcf77Decoder`] between an
//! interrupt handler (feeding samples at 1 kHz) and the base loop (polling
//! for a freshly computed epoch).
//!
//! Generalizes the teacher's AVR-specific `avr_device::interrupt::Mutex`
//! singleton (`clocks/timer.rs`) to any target the `critical-section` crate
//! supports, per spec.md §9's process-wide-singleton design note.
use core::cell::RefCell;
use critical_section::Mutex;

use crate::calendar::Calendar;
use crate::orchestrator::Dcf77Decoder;

/// Type of the `static` cell a caller declares to share a decoder across an
/// ISR boundary, e.g.:
///
/// ```ignore
/// static DECODER: Dcf77Cell<GregorianCalendar> = isr::new_cell();
/// ```
pub type Dcf77Cell<C> = Mutex<RefCell<Option<Dcf77Decoder<C>>>>;

/// Build the initial (empty) value for a [`Dcf77Cell`] `static`.
pub const fn new_cell<C: Calendar>() -> Dcf77Cell<C> {
    Mutex::new(RefCell::new(None))
}

/// Install `decoder` into the cell, replacing anything already registered.
pub fn register<C: Calendar>(cell: &Dcf77Cell<C>, decoder: Dcf77Decoder<C>) {
    critical_section::with(|cs| {
        *cell.borrow(cs).borrow_mut() = Some(decoder);
    });
}

/// Run `f` against the registered decoder, if any. Returns `None` when
/// nothing has been registered yet.
pub fn with<C: Calendar, R>(cell: &Dcf77Cell<C>, f: impl FnOnce(&mut Dcf77Decoder<C>) -> R) -> Option<R> {
    critical_section::with(|cs| cell.borrow(cs).borrow_mut().as_mut().map(f))
}
