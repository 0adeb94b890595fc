//! Tri-state symbol emitted by the averager every 10 ms.

/// A single averaged 10 ms symbol of the polled DCF77 pin.
///
/// `Unknown` carries zero weight downstream: a transitional or noisy
/// averaging window should not bias a lock in either direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Symbol {
    Low,
    High,
    Unknown,
}

impl Symbol {
    /// Signed contribution used by the phase and pulse-length correlators:
    /// `Low` = -1, `High` = +1, `Unknown` = 0.
    pub(crate) fn signed(self) -> i8 {
        match self {
            Symbol::Low => -1,
            Symbol::High => 1,
            Symbol::Unknown => 0,
        }
    }
}

impl ufmt::uDisplay for Symbol {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            Symbol::Low => f.write_char('_'),
            Symbol::High => f.write_char('#'),
            Symbol::Unknown => f.write_char('?'),
        }
    }
}

/// Length classification of a single second's pulse.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PulseClass {
    Short,
    Long,
    Unknown,
}

/// Classification of one second, as produced by the phase detector and
/// consumed by the seconds decoder.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pulse {
    pub class: PulseClass,
    /// True when the pulse body was strongly low across its whole length,
    /// i.e. a candidate for the minute's sync mark (absent pulse on second 59).
    pub is_sync_candidate: bool,
}

impl ufmt::uDisplay for Pulse {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let c = match self.class {
            PulseClass::Short => '_',
            PulseClass::Long => '#',
            PulseClass::Unknown => '?',
        };
        f.write_char(c)?;
        if self.is_sync_candidate {
            f.write_char('|')?;
        }
        Ok(())
    }
}
