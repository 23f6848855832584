use cert_types::{GregorianDate, HebrewCalendarDate};
use chrono::{Datelike, NaiveDate};

use crate::months::HebrewMonth;

/// Converts Gregorian dates to Hebrew calendar dates
pub trait HebrewCalendar {
    fn hebrew_date_of(&self, date: GregorianDate) -> HebrewCalendarDate;
}

impl<C: HebrewCalendar + ?Sized> HebrewCalendar for &C {
    fn hebrew_date_of(&self, date: GregorianDate) -> HebrewCalendarDate {
        (**self).hebrew_date_of(date)
    }
}

/// Offset between Rata Die day numbers and the Hebrew elapsed-day count
const HEBREW_EPOCH_OFFSET: i64 = 1_373_429;

const NISAN: u32 = 1;
const CHESHVAN: u32 = 8;
const KISLEV: u32 = 9;
const TISHREI: u32 = 7;
const ADAR: u32 = 12;

/// Fixed arithmetic Hebrew calendar (molad and postponement rules).
///
/// Months are numbered from Nisan = 1 to Adar II = 13; the year starts at
/// Tishrei (7).
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticCalendar;

impl ArithmeticCalendar {
    /// Leap years are years 3, 6, 8, 11, 14, 17 and 19 of the 19-year cycle
    pub fn is_leap_year(year: i64) -> bool {
        (1 + 7 * year).rem_euclid(19) < 7
    }

    pub fn months_in_year(year: i64) -> u32 {
        if Self::is_leap_year(year) {
            13
        } else {
            12
        }
    }

    /// Days from the epoch to Rosh Hashanah of `year`, postponements applied
    fn elapsed_days(year: i64) -> i64 {
        let prev = year - 1;
        let cycle_year = prev.rem_euclid(19);
        let months_elapsed =
            235 * prev.div_euclid(19) + 12 * cycle_year + (cycle_year * 7 + 1) / 19;
        let parts_elapsed = 204 + 793 * (months_elapsed % 1080);
        let hours_elapsed =
            5 + 12 * months_elapsed + 793 * (months_elapsed / 1080) + parts_elapsed / 1080;
        let parts = (parts_elapsed % 1080) + 1080 * (hours_elapsed % 24);
        let day = 1 + 29 * months_elapsed + hours_elapsed / 24;

        let postponed = parts >= 19440
            || (day % 7 == 2 && parts >= 9924 && !Self::is_leap_year(year))
            || (day % 7 == 1 && parts >= 16789 && Self::is_leap_year(prev));
        let alt_day = if postponed { day + 1 } else { day };

        // Rosh Hashanah never falls on Sunday, Wednesday or Friday
        if matches!(alt_day % 7, 0 | 3 | 5) {
            alt_day + 1
        } else {
            alt_day
        }
    }

    pub fn days_in_year(year: i64) -> i64 {
        Self::elapsed_days(year + 1) - Self::elapsed_days(year)
    }

    fn long_cheshvan(year: i64) -> bool {
        Self::days_in_year(year) % 10 == 5
    }

    fn short_kislev(year: i64) -> bool {
        Self::days_in_year(year) % 10 == 3
    }

    pub fn days_in_month(month: u32, year: i64) -> u32 {
        let short = match month {
            2 | 4 | 6 | 10 | 13 => true,
            ADAR => !Self::is_leap_year(year),
            CHESHVAN => !Self::long_cheshvan(year),
            KISLEV => Self::short_kislev(year),
            _ => false,
        };
        if short {
            29
        } else {
            30
        }
    }

    /// Rata Die day number of a Hebrew date
    pub fn to_absolute(year: i64, month: u32, day: u32) -> i64 {
        let mut days = day as i64;
        if month < TISHREI {
            for m in TISHREI..=Self::months_in_year(year) {
                days += Self::days_in_month(m, year) as i64;
            }
            for m in NISAN..month {
                days += Self::days_in_month(m, year) as i64;
            }
        } else {
            for m in TISHREI..month {
                days += Self::days_in_month(m, year) as i64;
            }
        }
        days + Self::elapsed_days(year) - HEBREW_EPOCH_OFFSET
    }

    /// Hebrew `(year, month, day)` for a Rata Die day number
    pub fn from_absolute(abs: i64) -> (i64, u32, u32) {
        let mut year = (abs + HEBREW_EPOCH_OFFSET).div_euclid(366);
        while abs >= Self::to_absolute(year + 1, TISHREI, 1) {
            year += 1;
        }

        let mut month = if abs < Self::to_absolute(year, NISAN, 1) {
            TISHREI
        } else {
            NISAN
        };
        while abs > Self::to_absolute(year, month, Self::days_in_month(month, year)) {
            month += 1;
        }

        let day = 1 + abs - Self::to_absolute(year, month, 1);
        (year, month, day as u32)
    }

    /// Gregorian date of a Hebrew date, if it is representable
    pub fn to_gregorian(year: i64, month: u32, day: u32) -> Option<NaiveDate> {
        let abs = i32::try_from(Self::to_absolute(year, month, day)).ok()?;
        NaiveDate::from_num_days_from_ce_opt(abs)
    }
}

impl HebrewCalendar for ArithmeticCalendar {
    fn hebrew_date_of(&self, date: GregorianDate) -> HebrewCalendarDate {
        let (year, month, day) = Self::from_absolute(date.num_days_from_ce() as i64);
        let month_name = HebrewMonth::from_number(month, Self::is_leap_year(year))
            .map(HebrewMonth::name)
            .unwrap_or_default();
        HebrewCalendarDate::new(day, month_name, year as i32)
    }
}
