//! Hebrew calendar date rendering
//!
//! Turns a Gregorian date into the traditional Hebrew notation printed on the
//! certificate, e.g. `י"א בטבת תשפ"ו`.
//!
//! The calendar conversion itself sits behind [`HebrewCalendar`]; this crate
//! only owns the letter tables and the punctuation rules. [`ArithmeticCalendar`]
//! is the default collaborator.

pub mod calendar;
pub mod format;
pub mod gematria;
pub mod months;

pub use calendar::{ArithmeticCalendar, HebrewCalendar};
pub use format::{
    days_before, format_gregorian_hebrew_month, format_hebrew_date, format_hebrew_date_with,
    format_numeric_date, render_hebrew_date,
};
pub use months::HebrewMonth;
