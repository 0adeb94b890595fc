//! Decodes the DCF77 longwave time signal from a 1 kHz stream of raw pin
//! samples into a calibrated UTC epoch.
//!
//! The crate has no hardware access and no I/O of its own: driving a GPIO
//! pin at 1 kHz, choosing a [`calendar::Calendar`] implementation, and
//! persisting the result are all left to the caller. See
//! [`orchestrator::Dcf77Decoder`] for the entry point, and [`isr`] for
//! sharing one decoder between an interrupt handler and a base loop.
#![cfg_attr(not(test), no_std)]

pub mod bcd;
pub mod calendar;
pub mod datetime;
pub mod error;
pub mod isr;
pub mod orchestrator;
pub mod phase;
pub mod sampler;
pub mod score_bin;
pub mod seconds;
pub mod symbol;
pub mod timezone;

pub use calendar::{Calendar, GregorianCalendar};
pub use datetime::{Date, DayOfWeek, Datetime, Time};
pub use error::Dcf77Error;
pub use orchestrator::Dcf77Decoder;
