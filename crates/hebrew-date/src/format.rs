//! Printed date strings
//!
//! Day and year numerals follow the certificate's conventions rather than a
//! general gematria algorithm: only the letters needed for Hebrew years 5700
//! through 5899 are produced.

use cert_types::{GregorianDate, HebrewCalendarDate};
use chrono::{Datelike, Duration};

use crate::calendar::{ArithmeticCalendar, HebrewCalendar};
use crate::gematria::{insert_gershayim, numeral};
use crate::months::{gregorian_month_letters, month_letters};

/// Fixed prefix of every year numeral: tav-shin, 700 + 300 = 5700's "תש"
const YEAR_PREFIX: &str = "תש";

/// Format `date` as a Hebrew calendar date using the arithmetic calendar.
///
/// ```
/// use chrono::NaiveDate;
/// let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
/// assert_eq!(hebrew_date::format_hebrew_date(date), "י\"א בטבת תשפ\"ו");
/// ```
pub fn format_hebrew_date(date: GregorianDate) -> String {
    format_hebrew_date_with(&ArithmeticCalendar, date)
}

/// Format `date` with a caller-supplied calendar collaborator.
pub fn format_hebrew_date_with<C: HebrewCalendar>(calendar: &C, date: GregorianDate) -> String {
    let hebrew = calendar.hebrew_date_of(date);
    tracing::debug!(
        "{} is {} {} {}",
        date,
        hebrew.day,
        hebrew.month_name,
        hebrew.year
    );
    render_hebrew_date(&hebrew)
}

/// Render `"<day> ב<month> <year>"` in Hebrew letters.
pub fn render_hebrew_date(date: &HebrewCalendarDate) -> String {
    format!(
        "{} ב{} {}",
        day_numeral(date.day),
        month_letters(&date.month_name),
        year_numeral(date.year)
    )
}

/// Day of month in letters; two-letter numerals get a gershayim.
///
/// Days outside 1..=30 print as plain decimal.
pub fn day_numeral(day: u32) -> String {
    match numeral(day as i64) {
        // the check is on string length, matching the table for 1..=30
        Some(letters) if letters.chars().count() == 2 => insert_gershayim(letters),
        Some(letters) => letters.to_string(),
        None => day.to_string(),
    }
}

/// Letter for the hundreds digit of the short year: 7 → פ, 8 → צ, else empty
pub fn hundreds_letter(hundreds: i64) -> &'static str {
    match hundreds {
        7 => "פ",
        8 => "צ",
        _ => "",
    }
}

/// Year numeral such as `תשפ"ו` for 5786.
///
/// Only the hundreds and ones digits of `year - 5000` contribute letters; the
/// tens digit is not rendered.
pub fn year_numeral(year: i32) -> String {
    let short = year as i64 - 5000;
    let hundreds = short.div_euclid(100);
    let ones = short % 10;

    let mut letters = String::from(YEAR_PREFIX);
    letters.push_str(hundreds_letter(hundreds));
    if ones > 0 {
        letters.push_str(numeral(ones).unwrap_or_default());
    }

    if letters.chars().count() > 1 {
        insert_gershayim(&letters)
    } else {
        letters
    }
}

/// `"<day> ב<month> <year>"` with the Gregorian month written in Hebrew,
/// e.g. `"1 בדצמבר 2025"`.
pub fn format_gregorian_hebrew_month(date: GregorianDate) -> String {
    let month = gregorian_month_letters(date.month0()).unwrap_or_default();
    format!("{} ב{} {}", date.day(), month, date.year())
}

/// `DD/MM/YYYY`
pub fn format_numeric_date(date: GregorianDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// The date `days` days before `date`, clamped at the earliest representable date
pub fn days_before(date: GregorianDate, days: u32) -> GregorianDate {
    date.checked_sub_signed(Duration::days(days as i64))
        .unwrap_or(GregorianDate::MIN)
}
