//! Property-based tests for hebrew-date
//!
//! Covers gershayim placement and the arithmetic calendar using proptest.

use cert_types::HebrewCalendarDate;
use chrono::NaiveDate;
use hebrew_date::calendar::{ArithmeticCalendar, HebrewCalendar};
use hebrew_date::format::{day_numeral, year_numeral};
use hebrew_date::render_hebrew_date;
use proptest::prelude::*;

fn gregorian_date() -> impl Strategy<Value = NaiveDate> {
    // 1940-01-01 ..= 2139-12-31, roughly Hebrew years 5700..5900
    (0i64..73_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1940, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================================
    // Numerals
    // ============================================================

    #[test]
    fn two_letter_days_carry_exactly_one_mark(day in 11u32..=29) {
        prop_assume!(day != 20);
        let numeral = day_numeral(day);
        let chars: Vec<char> = numeral.chars().collect();
        prop_assert_eq!(chars.len(), 3);
        prop_assert_eq!(chars[1], '"');
        prop_assert_eq!(numeral.matches('"').count(), 1);
    }

    #[test]
    fn year_numerals_carry_one_mark_before_last_letter(year in 5700i32..5900) {
        let numeral = year_numeral(year);
        let chars: Vec<char> = numeral.chars().collect();
        prop_assert_eq!(numeral.matches('"').count(), 1);
        prop_assert_eq!(chars[chars.len() - 2], '"');
        prop_assert!(numeral.starts_with("תש"));
    }

    #[test]
    fn hundreds_letter_matches_century(year in 5700i32..5900) {
        let expected = if year < 5800 { 'פ' } else { 'צ' };
        let letters = year_numeral(year).replace('"', "");
        prop_assert_eq!(letters.chars().nth(2), Some(expected));
    }

    #[test]
    fn rendered_date_has_three_space_separated_parts(
        day in 1u32..=30,
        year in 5700i32..5900
    ) {
        let rendered = render_hebrew_date(&HebrewCalendarDate::new(day, "Kislev", year));
        let parts: Vec<&str> = rendered.split(' ').collect();
        prop_assert_eq!(parts.len(), 3);
        prop_assert_eq!(parts[1], "בכסלו");
    }

    // ============================================================
    // Arithmetic calendar
    // ============================================================

    #[test]
    fn calendar_days_are_in_range(date in gregorian_date()) {
        let hebrew = ArithmeticCalendar.hebrew_date_of(date);
        prop_assert!((1..=30).contains(&hebrew.day));
        prop_assert!(hebrew.month_name.parse::<hebrew_date::HebrewMonth>().is_ok());
    }

    #[test]
    fn consecutive_days_advance_or_start_a_month(date in gregorian_date()) {
        let today = ArithmeticCalendar.hebrew_date_of(date);
        let tomorrow = ArithmeticCalendar.hebrew_date_of(date.succ_opt().unwrap());
        if tomorrow.day == 1 {
            prop_assert!(today.day == 29 || today.day == 30);
            prop_assert_ne!(today.month_name, tomorrow.month_name);
        } else {
            prop_assert_eq!(tomorrow.day, today.day + 1);
            prop_assert_eq!(today.month_name, tomorrow.month_name);
            prop_assert_eq!(today.year, tomorrow.year);
        }
    }

    #[test]
    fn absolute_day_numbers_round_trip(date in gregorian_date()) {
        use chrono::Datelike;
        let abs = date.num_days_from_ce() as i64;
        let (year, month, day) = ArithmeticCalendar::from_absolute(abs);
        prop_assert_eq!(ArithmeticCalendar::to_absolute(year, month, day), abs);
    }
}
