//! Seconds decoder: finds the first second of the minute among the pulses
//! the phase detector reports, and accumulates the minute's raw data bits.
use crate::score_bin::ScoreBin;
use crate::symbol::{Pulse, PulseClass};

/// Seconds per minute, and the width of the decoder's lock bin.
pub const SECONDS_PER_MINUTE: usize = 60;
const LOCK_THRESHOLD: i8 = 7;
/// Position of the DCF77 date-parity bit; also the highest bit this decoder
/// ever shifts in (see `protocol` bit layout in DESIGN.md).
const TOP_BIT: u64 = 1 << 59;

/// The raw data bits of one minute, shifted in LSB-first as they arrive,
/// plus how many of the 60 were actually received (vs. dropped as unknown).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitData {
    pub bit_shifter: u64,
    pub valid_bit_ctr: u8,
}

/// `x` is nonzero and has an even number of set bits: the encoding DCF77 uses
/// for its three even-parity checks.
fn even_parity_and_nonzero(x: u64) -> bool {
    x != 0 && x.count_ones() % 2 == 0
}

/// Finds the start of the minute inside the long/short/absent pulse stream
/// and shifts the minute's data bits into a 60-bit register.
pub struct SecondsDecoder {
    bin: ScoreBin<SECONDS_PER_MINUTE>,
    active_bin: usize,
    minute_start_bin: Option<usize>,
    cur: BitData,
    prev: BitData,
}

impl SecondsDecoder {
    pub const fn new() -> Self {
        Self {
            bin: ScoreBin::new(0),
            active_bin: 0,
            minute_start_bin: None,
            cur: BitData { bit_shifter: 0, valid_bit_ctr: 0 },
            prev: BitData { bit_shifter: 0, valid_bit_ctr: 0 },
        }
    }

    /// Reset the lock and all accumulated bits, e.g. after a signal gap.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one second's pulse classification. Returns the previous minute's
    /// bits once the decoder has locked and second 59 has just elapsed.
    pub fn on_pulse(&mut self, pulse: Pulse) -> Option<BitData> {
        self.cur.valid_bit_ctr = self.cur.valid_bit_ctr.wrapping_add(1);
        self.cur.bit_shifter >>= 1;
        if pulse.class == PulseClass::Long {
            self.cur.bit_shifter |= TOP_BIT;
        }

        if pulse.is_sync_candidate || pulse.class != PulseClass::Unknown {
            let mut score: i8 = 0;
            // 0-bit expected on second 0 (bit 0 of the register once shifted in).
            score += if self.cur.bit_shifter & 1 != 0 { -1 } else { 1 };
            // Bits 17/18 (CEST/CET) must differ.
            score += if (self.cur.bit_shifter ^ (self.cur.bit_shifter >> 1)) & 0x2_0000 != 0 { 1 } else { -1 };
            // 1-bit expected on second 20 (start-of-time marker).
            score += if self.cur.bit_shifter & 0x10_0000 != 0 { 1 } else { -1 };
            // Even parity over bits 21-28 (minute).
            score += if even_parity_and_nonzero(self.cur.bit_shifter & 0x1FE0_0000) { 1 } else { -1 };
            // Even parity over bits 29-35 (hour).
            score += if even_parity_and_nonzero((self.cur.bit_shifter >> 4) & 0xFE00_0000) { 1 } else { -1 };
            // Even parity over bits 36-58 (date).
            score += if even_parity_and_nonzero((self.cur.bit_shifter >> 28) & 0x7FFF_FF00) { 1 } else { -1 };
            // Sync mark (absent pulse) expected on second 59.
            score += if pulse.is_sync_candidate && pulse.class == PulseClass::Short { 6 } else { -6 };
            self.bin.add(self.active_bin, score);
        }

        self.minute_start_bin = self.bin.maximum(LOCK_THRESHOLD);
        self.active_bin = if self.active_bin < SECONDS_PER_MINUTE - 1 { self.active_bin + 1 } else { 0 };

        let mut completed = None;
        if self.current_second() == Some(59) {
            self.prev = self.cur;
            self.cur = BitData::default();
            completed = Some(self.prev);
        }
        completed
    }

    /// Current second of the minute, or `None` before the decoder has
    /// locked onto a minute start.
    pub fn current_second(&self) -> Option<u8> {
        let start = self.minute_start_bin?;
        let second = (2 * SECONDS_PER_MINUTE + self.active_bin - 2 - start) % SECONDS_PER_MINUTE;
        Some(second as u8)
    }

    pub fn is_locked(&self) -> bool {
        self.minute_start_bin.is_some()
    }
}

impl Default for SecondsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> Pulse {
        Pulse { class: PulseClass::Short, is_sync_candidate: false }
    }
    fn sync() -> Pulse {
        Pulse { class: PulseClass::Short, is_sync_candidate: true }
    }

    #[test]
    fn locks_after_repeated_sync_marks_every_60_seconds() {
        let mut dec = SecondsDecoder::new();
        // Feed several minutes of all-short pulses with a sync mark every 60th.
        for minute in 0..3 {
            for s in 0..59 {
                let _ = dec.on_pulse(short());
                let _ = (minute, s);
            }
            dec.on_pulse(sync());
        }
        assert!(dec.is_locked());
    }

    #[test]
    fn reports_second_59_completion_once_locked() {
        let mut dec = SecondsDecoder::new();
        let mut saw_completion = false;
        for minute in 0..3 {
            for _ in 0..59 {
                if dec.on_pulse(short()).is_some() {
                    saw_completion = true;
                }
            }
            if dec.on_pulse(sync()).is_some() {
                saw_completion = true;
            }
            let _ = minute;
        }
        assert!(saw_completion);
    }

    #[test]
    fn even_parity_helper_rejects_zero_and_odd_parity() {
        assert!(!even_parity_and_nonzero(0));
        assert!(!even_parity_and_nonzero(0b1));
        assert!(even_parity_and_nonzero(0b11));
    }

    /// S4: feeding the 59 data bits of the documented Sat 2018-11-24 02:18
    /// CET frame (also used in scenario S1) followed by a sync mark
    /// satisfies every fixed-bit/parity check, so second 59's bin should
    /// jump by exactly +1+1+1+1+1+1+6 = 12 in that single step.
    #[test]
    fn score_jumps_by_twelve_when_every_check_passes() {
        const FRAME: u64 = 0x623a_4843_141a_e6;
        let mut dec = SecondsDecoder::new();
        for second in 0..59u8 {
            let bit = (FRAME >> second) & 1;
            let class = if bit == 1 { PulseClass::Long } else { PulseClass::Short };
            dec.on_pulse(Pulse { class, is_sync_candidate: false });
        }
        let before = dec.bin.get_unsigned(59);
        dec.on_pulse(sync());
        let after = dec.bin.get_unsigned(59);
        assert_eq!(after as i16 - before as i16, 12);
    }
}
