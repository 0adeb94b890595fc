//! Top-level orchestrator: wires the sampler, phase detector, seconds
//! decoder, six BCD field decoders and timezone decoder together, and
//! resolves a calibrated UTC epoch once per synced minute.
use crate::bcd::BcdDecoder;
use crate::calendar::Calendar;
use crate::datetime::{Date, DayOfWeek, Time};
use crate::error::Dcf77Error;
use crate::phase::PhaseDetector;
use crate::sampler::Averager;
use crate::seconds::{BitData, SecondsDecoder};
use crate::timezone::TimezoneDecoder;

fn decode_weekday(value: u8) -> Result<DayOfWeek, Dcf77Error> {
    DayOfWeek::try_from(value).map_err(|_| Dcf77Error::InvalidWeekday(value))
}

/// Drives the full DCF77 decoding pipeline from a 1 kHz stream of raw pin
/// samples to a calibrated UTC epoch, resolved once per synced minute.
///
/// `C` is the calendar/timezone collaborator (see [`Calendar`]); callers
/// with no calendar library of their own can use [`crate::calendar::GregorianCalendar`].
pub struct Dcf77Decoder<C: Calendar> {
    invert_polarity: bool,
    averager: Averager,
    phase: PhaseDetector,
    seconds: SecondsDecoder,
    minutes: BcdDecoder<60>,
    hours: BcdDecoder<24>,
    days: BcdDecoder<31>,
    weekdays: BcdDecoder<7>,
    months: BcdDecoder<12>,
    years: BcdDecoder<100>,
    tzd: TimezoneDecoder,
    calendar: C,
    pending_epoch: Option<i64>,
    last_error: Option<Dcf77Error>,
}

impl<C: Calendar> Dcf77Decoder<C> {
    /// `invert_polarity` matches spec.md §4.1: some receivers idle high.
    pub const fn new(invert_polarity: bool, calendar: C) -> Self {
        Self {
            invert_polarity,
            averager: Averager::new(invert_polarity),
            phase: PhaseDetector::new(),
            seconds: SecondsDecoder::new(),
            minutes: BcdDecoder::new(21, 7, true, 0, 4),
            hours: BcdDecoder::new(29, 6, true, 0, 3),
            days: BcdDecoder::new(36, 6, false, 1, 3),
            weekdays: BcdDecoder::new(42, 3, false, 1, 2),
            months: BcdDecoder::new(45, 5, false, 1, 2),
            years: BcdDecoder::new(50, 8, false, 0, 4),
            tzd: TimezoneDecoder::new(),
            calendar,
            pending_epoch: None,
            last_error: None,
        }
    }

    /// Discard every accumulated lock, e.g. after the caller detects a
    /// multi-minute signal gap. The calendar collaborator is left untouched.
    pub fn reset(&mut self) {
        self.averager.reset();
        self.phase.reset();
        self.seconds.reset();
        self.minutes.clear();
        self.hours.clear();
        self.days.clear();
        self.weekdays.clear();
        self.months.clear();
        self.years.clear();
        self.tzd.clear();
        self.pending_epoch = None;
    }

    /// Feed one raw pin sample. Call at 1 kHz ± 5%, typically from an ISR.
    /// Cheap on every call that doesn't complete a 10 ms averaging window,
    /// a pulse, or a minute.
    pub fn process_one_sample(&mut self, raw: bool) {
        let Some(symbol) = self.averager.process_sample(raw) else { return };
        let Some(pulse) = self.phase.on_symbol(symbol) else { return };
        let Some(data) = self.seconds.on_pulse(pulse) else { return };
        self.pending_epoch = self.update_clock(&data);
    }

    /// Poll for a freshly computed epoch. Returns `Some` at most once per
    /// synced minute; typically called from the base loop.
    pub fn update(&mut self) -> Option<i64> {
        self.pending_epoch.take()
    }

    /// The last non-`InvalidWeekday`-class error observed, if any.
    pub fn last_error(&self) -> Option<Dcf77Error> {
        self.last_error
    }

    /// Current second of the minute, once the seconds decoder has locked.
    pub fn current_second(&self) -> Option<u8> {
        self.seconds.current_second()
    }

    /// The polarity this decoder was configured with, see spec.md §4.1.
    pub fn invert_polarity(&self) -> bool {
        self.invert_polarity
    }

    fn update_clock(&mut self, data: &BitData) -> Option<i64> {
        let minutes_ok = self.minutes.update(data);
        let hours_ok = self.hours.update(data);
        let days_ok = self.days.update(data);
        let weekdays_ok = self.weekdays.update(data);
        let months_ok = self.months.update(data);
        let years_ok = self.years.update(data);
        let tzd_ok = self.tzd.update(data);
        if !(minutes_ok && hours_ok && days_ok && weekdays_ok && months_ok && years_ok && tzd_ok) {
            return None;
        }

        let minute = self.minutes.get_time()?;
        let mut hour = self.hours.get_time()?;
        let day = self.days.get_time()?;
        let raw_weekday = self.weekdays.get_time()?;
        let month = self.months.get_time()?;
        let year = self.years.get_time()?;

        let weekday = match decode_weekday(raw_weekday) {
            Ok(weekday) => weekday,
            Err(e) => {
                self.last_error = Some(e);
                return None;
            }
        };

        let offset = self.tzd.seconds_offset(&mut hour, minute);
        let date = Date { day, month, year, weekday };
        let time = Time { hour, minute };
        let naive = self.calendar.to_epoch(date, time);
        let epoch = naive - offset as i64;

        let (next_date, next_time) = self.calendar.next_minute_local(epoch);
        self.minutes.set_prediction(next_time.minute);
        self.hours.set_prediction(next_time.hour);
        self.days.set_prediction(next_date.day);
        self.months.set_prediction(next_date.month);
        self.years.set_prediction(next_date.year);
        self.weekdays.set_prediction(next_date.weekday as u8);

        Some(epoch)
    }
}
