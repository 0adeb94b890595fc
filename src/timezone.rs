//! Timezone decoder: tracks the CEST/CET announcement and change bits to
//! resolve the UTC offset, correcting the one ambiguous minute a DST
//! transition creates in the binned hour field.
use crate::seconds::{BitData, SECONDS_PER_MINUTE};

const START_BIT: u8 = 16;
const TIMEZONE_CHANGE_BIT: u64 = 1 << 16;
const CEST_BIT: u64 = 1 << 17;
const CET_BIT: u64 = 1 << 18;
const ONE_HOUR: i16 = 3600;
const TWO_HOURS: i16 = 7200;

/// Tracks whether summer time is in effect and whether a change has been
/// announced, from the per-minute CEST/CET/announcement bits.
pub struct TimezoneDecoder {
    change_announced: u8,
    is_summer_time: i8,
}

impl TimezoneDecoder {
    pub const fn new() -> Self {
        Self { change_announced: 0, is_summer_time: 0 }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Feed one minute's bits. Returns `false` when the register doesn't
    /// yet hold enough valid bits to cover the timezone field.
    pub fn update(&mut self, data: &BitData) -> bool {
        if (data.valid_bit_ctr as usize) < SECONDS_PER_MINUTE - START_BIT as usize {
            return false;
        }
        if data.bit_shifter & CEST_BIT != 0 && self.is_summer_time < i8::MAX {
            self.is_summer_time += 1;
        }
        if data.bit_shifter & CET_BIT != 0 && self.is_summer_time > i8::MIN {
            self.is_summer_time -= 1;
        }
        if data.bit_shifter & TIMEZONE_CHANGE_BIT != 0 {
            self.change_announced = self.change_announced.saturating_add(1);
        } else if self.change_announced > 0 {
            self.change_announced -= 1;
        }
        true
    }

    /// Resolve the UTC offset in seconds for the just-decoded `hour`:`minute`,
    /// correcting the hour reading across a DST transition minute.
    ///
    /// The binned hour field rides through the transition one tick behind:
    /// on the top-of-hour minute right after a transition it still reads
    /// the old hour, so it's nudged by one here rather than in the hour
    /// `BcdDecoder` itself.
    pub fn seconds_offset(&mut self, hour: &mut u8, minute: u8) -> i16 {
        if minute == 0 && self.change_announced > 0 {
            match *hour {
                3 => {
                    if self.is_summer_time > 0 {
                        *hour -= 1;
                        self.is_summer_time = -1;
                    }
                }
                2 => {
                    if self.is_summer_time < 0 {
                        *hour += 1;
                        self.is_summer_time = 1;
                    }
                }
                _ => {}
            }
        }
        if self.is_summer_time > 0 {
            TWO_HOURS
        } else {
            ONE_HOUR
        }
    }
}

impl Default for TimezoneDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(bit_shifter: u64) -> BitData {
        BitData { bit_shifter, valid_bit_ctr: 60 }
    }

    #[test]
    fn defaults_to_standard_time_offset() {
        let mut tzd = TimezoneDecoder::new();
        let mut hour = 10u8;
        assert_eq!(tzd.seconds_offset(&mut hour, 30), ONE_HOUR);
    }

    #[test]
    fn cest_bit_switches_to_summer_offset() {
        let mut tzd = TimezoneDecoder::new();
        for _ in 0..3 {
            tzd.update(&data(CEST_BIT));
        }
        let mut hour = 10u8;
        assert_eq!(tzd.seconds_offset(&mut hour, 30), TWO_HOURS);
    }

    #[test]
    fn update_refuses_when_not_enough_valid_bits() {
        let mut tzd = TimezoneDecoder::new();
        assert!(!tzd.update(&BitData { bit_shifter: 0, valid_bit_ctr: 0 }));
    }

    #[test]
    fn winter_transition_corrects_the_ambiguous_hour() {
        let mut tzd = TimezoneDecoder::new();
        for _ in 0..5 {
            tzd.update(&data(CEST_BIT));
        }
        tzd.update(&data(TIMEZONE_CHANGE_BIT));
        let mut hour = 3u8;
        let offset = tzd.seconds_offset(&mut hour, 0);
        assert_eq!(hour, 2);
        assert_eq!(offset, ONE_HOUR);
    }

    #[test]
    fn ambiguous_hour_is_only_corrected_on_the_top_of_the_hour() {
        let mut tzd = TimezoneDecoder::new();
        for _ in 0..5 {
            tzd.update(&data(CEST_BIT));
        }
        tzd.update(&data(TIMEZONE_CHANGE_BIT));
        let mut hour = 3u8;
        let offset = tzd.seconds_offset(&mut hour, 15);
        assert_eq!(hour, 3);
        assert_eq!(offset, TWO_HOURS);
    }
}
