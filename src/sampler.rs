//! Sampler/averager: downsamples the raw 1 kHz pin stream into one
//! [`Symbol`] every ten samples.
use crate::symbol::Symbol;

/// Number of raw samples averaged into a single [`Symbol`].
pub const SAMPLES_PER_SYMBOL: u8 = 10;

/// Averages ten 1 ms pin samples into one 10 ms [`Symbol`].
///
/// A clean signal saturates the window (sum near 0 or 10); a transitional
/// or noisy window lands in between and is reported `Unknown`, contributing
/// zero weight to every downstream correlator.
pub struct Averager {
    /// Inverts the raw sample before averaging, for receivers that idle high.
    invert: bool,
    sum: u8,
    count: u8,
}

impl Averager {
    pub const fn new(invert_polarity: bool) -> Self {
        Self { invert: invert_polarity, sum: 0, count: 0 }
    }

    /// Reset the accumulating window, keeping the configured polarity.
    pub fn reset(&mut self) {
        self.sum = 0;
        self.count = 0;
    }

    /// Feed one raw boolean pin sample. Call at 1 kHz ± 5%.
    ///
    /// Returns `Some(symbol)` every ten calls, `None` otherwise.
    pub fn process_sample(&mut self, raw: bool) -> Option<Symbol> {
        let bit = if self.invert { !raw } else { raw };
        self.sum += bit as u8;
        self.count += 1;

        if self.count < SAMPLES_PER_SYMBOL {
            return None;
        }

        let symbol = match self.sum {
            0..=2 => Symbol::Low,
            8..=10 => Symbol::High,
            _ => Symbol::Unknown,
        };
        self.sum = 0;
        self.count = 0;
        Some(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(avg: &mut Averager, bits: &[bool]) -> Option<Symbol> {
        let mut last = None;
        for &b in bits {
            last = avg.process_sample(b);
        }
        last
    }

    #[test]
    fn all_high_is_high() {
        let mut avg = Averager::new(false);
        assert_eq!(feed(&mut avg, &[true; 10]), Some(Symbol::High));
    }

    #[test]
    fn all_low_is_low() {
        let mut avg = Averager::new(false);
        assert_eq!(feed(&mut avg, &[false; 10]), Some(Symbol::Low));
    }

    #[test]
    fn mixed_window_is_unknown() {
        let mut avg = Averager::new(false);
        let bits = [true, true, true, true, true, false, false, false, false, false];
        assert_eq!(feed(&mut avg, &bits), Some(Symbol::Unknown));
    }

    #[test]
    fn emits_only_every_tenth_sample() {
        let mut avg = Averager::new(false);
        for _ in 0..9 {
            assert_eq!(avg.process_sample(true), None);
        }
        assert_eq!(avg.process_sample(true), Some(Symbol::High));
    }

    #[test]
    fn polarity_inversion_flips_the_result() {
        let mut avg = Averager::new(true);
        assert_eq!(feed(&mut avg, &[true; 10]), Some(Symbol::Low));
    }
}
