//! Errors this crate can report. Every stage's normal "not locked yet"
//! outcome is modelled with `Option`/`bool`, not an error; these variants
//! cover genuine caller misuse instead.

/// Errors that may arise while driving a [`crate::orchestrator::Dcf77Decoder`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dcf77Error {
    /// A decoded day-of-week value fell outside 1-7.
    InvalidWeekday(u8),
}

impl ufmt::uDisplay for Dcf77Error {
    /// Format the error for a caller's own diagnostic output (e.g. a UART),
    /// in the same register the teacher's `WorkflowError` uses.
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            Dcf77Error::InvalidWeekday(w) => f.write_str("invalid weekday ").and_then(|_| w.fmt(f)),
        }
    }
}
