//! Local date/time as decoded from the DCF77 frame: a two-digit year
//! (`00` meaning 2000), a 1-7 day of week, and minute resolution.
//!
//! Kept deliberately separate from [`crate::calendar::Calendar`], which
//! turns one of these into a UTC epoch: this type only ever holds the
//! local civil fields DCF77 transmits.

/// Day of week as DCF77 encodes it: 1 = Monday, 7 = Sunday.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl TryFrom<u8> for DayOfWeek {
    type Error = ();

    fn try_from(weekday: u8) -> Result<Self, Self::Error> {
        match weekday {
            1 => Ok(DayOfWeek::Monday),
            2 => Ok(DayOfWeek::Tuesday),
            3 => Ok(DayOfWeek::Wednesday),
            4 => Ok(DayOfWeek::Thursday),
            5 => Ok(DayOfWeek::Friday),
            6 => Ok(DayOfWeek::Saturday),
            7 => Ok(DayOfWeek::Sunday),
            _ => Err(()),
        }
    }
}

/// Calendar date decoded from one DCF77 frame. `year` is two digits,
/// `00`-`99`, meaning `2000`-`2099`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Date {
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub weekday: DayOfWeek,
}

impl Date {
    /// Full four-digit year.
    pub fn full_year(&self) -> u16 {
        2000 + self.year as u16
    }
}

/// Local time decoded from one DCF77 frame, minute resolution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
}

/// A fully decoded DCF77 frame: local date, local time and the UTC offset
/// (in seconds) the timezone decoder resolved for it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Datetime {
    pub date: Date,
    pub time: Time,
    pub utc_offset_seconds: i32,
}

impl ufmt::uDisplay for Date {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str("20")?;
        if self.year < 10 {
            f.write_str("0")?;
        }
        self.year.fmt(f)?;
        if self.month < 10 {
            f.write_str("-0")?;
        } else {
            f.write_str("-")?;
        }
        self.month.fmt(f)?;
        if self.day < 10 {
            f.write_str("-0")?;
        } else {
            f.write_str("-")?;
        }
        self.day.fmt(f)
    }
}

impl ufmt::uDisplay for Time {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        if self.hour < 10 {
            f.write_str("0")?;
        }
        self.hour.fmt(f)?;
        if self.minute < 10 {
            f.write_str(":0")?;
        } else {
            f.write_str(":")?;
        }
        self.minute.fmt(f)
    }
}

impl ufmt::uDisplay for Datetime {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        self.date.fmt(f)?;
        f.write_str("T")?;
        self.time.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_of_week_round_trips() {
        for w in 1..=7u8 {
            assert_eq!(DayOfWeek::try_from(w).unwrap() as u8, w);
        }
        assert!(DayOfWeek::try_from(0).is_err());
        assert!(DayOfWeek::try_from(8).is_err());
    }

    #[test]
    fn full_year_adds_the_century() {
        let date = Date { day: 24, month: 11, year: 18, weekday: DayOfWeek::Saturday };
        assert_eq!(date.full_year(), 2018);
    }
}
