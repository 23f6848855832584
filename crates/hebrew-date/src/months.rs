//! Month name tables
//!
//! Hebrew calendar months are exchanged with the calendar collaborator by
//! transliterated name ("Tevet", "Adar II"). Gregorian months are printed in
//! Hebrew letters for the Gregorian date line.

use std::fmt;
use std::str::FromStr;

/// The fourteen month names a Hebrew calendar date can carry.
///
/// `Adar` appears in common years; leap years have `AdarI` and `AdarII` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HebrewMonth {
    Nisan,
    Iyyar,
    Sivan,
    Tamuz,
    Av,
    Elul,
    Tishrei,
    Cheshvan,
    Kislev,
    Tevet,
    Shvat,
    Adar,
    AdarI,
    AdarII,
}

impl HebrewMonth {
    pub const ALL: [HebrewMonth; 14] = [
        HebrewMonth::Nisan,
        HebrewMonth::Iyyar,
        HebrewMonth::Sivan,
        HebrewMonth::Tamuz,
        HebrewMonth::Av,
        HebrewMonth::Elul,
        HebrewMonth::Tishrei,
        HebrewMonth::Cheshvan,
        HebrewMonth::Kislev,
        HebrewMonth::Tevet,
        HebrewMonth::Shvat,
        HebrewMonth::Adar,
        HebrewMonth::AdarI,
        HebrewMonth::AdarII,
    ];

    /// Transliterated name as exchanged with the calendar collaborator
    pub fn name(self) -> &'static str {
        match self {
            HebrewMonth::Nisan => "Nisan",
            HebrewMonth::Iyyar => "Iyyar",
            HebrewMonth::Sivan => "Sivan",
            HebrewMonth::Tamuz => "Tamuz",
            HebrewMonth::Av => "Av",
            HebrewMonth::Elul => "Elul",
            HebrewMonth::Tishrei => "Tishrei",
            HebrewMonth::Cheshvan => "Cheshvan",
            HebrewMonth::Kislev => "Kislev",
            HebrewMonth::Tevet => "Tevet",
            HebrewMonth::Shvat => "Sh'vat",
            HebrewMonth::Adar => "Adar",
            HebrewMonth::AdarI => "Adar I",
            HebrewMonth::AdarII => "Adar II",
        }
    }

    /// Unvocalized Hebrew spelling
    pub fn letters(self) -> &'static str {
        match self {
            HebrewMonth::Nisan => "ניסן",
            HebrewMonth::Iyyar => "אייר",
            HebrewMonth::Sivan => "סיון",
            HebrewMonth::Tamuz => "תמוז",
            HebrewMonth::Av => "אב",
            HebrewMonth::Elul => "אלול",
            HebrewMonth::Tishrei => "תשרי",
            HebrewMonth::Cheshvan => "חשון",
            HebrewMonth::Kislev => "כסלו",
            HebrewMonth::Tevet => "טבת",
            HebrewMonth::Shvat => "שבט",
            HebrewMonth::Adar => "אדר",
            HebrewMonth::AdarI => "אדר א",
            HebrewMonth::AdarII => "אדר ב",
        }
    }

    /// Month from its position in the year, counting from Nisan = 1.
    ///
    /// Month 12 is `Adar` in a common year and `AdarI` in a leap year;
    /// month 13 only exists in leap years.
    pub fn from_number(month: u32, leap_year: bool) -> Option<Self> {
        let month = match (month, leap_year) {
            (1, _) => HebrewMonth::Nisan,
            (2, _) => HebrewMonth::Iyyar,
            (3, _) => HebrewMonth::Sivan,
            (4, _) => HebrewMonth::Tamuz,
            (5, _) => HebrewMonth::Av,
            (6, _) => HebrewMonth::Elul,
            (7, _) => HebrewMonth::Tishrei,
            (8, _) => HebrewMonth::Cheshvan,
            (9, _) => HebrewMonth::Kislev,
            (10, _) => HebrewMonth::Tevet,
            (11, _) => HebrewMonth::Shvat,
            (12, false) => HebrewMonth::Adar,
            (12, true) => HebrewMonth::AdarI,
            (13, true) => HebrewMonth::AdarII,
            _ => return None,
        };
        Some(month)
    }
}

impl fmt::Display for HebrewMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMonth(pub String);

impl fmt::Display for UnknownMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown Hebrew month name: {}", self.0)
    }
}

impl std::error::Error for UnknownMonth {}

impl FromStr for HebrewMonth {
    type Err = UnknownMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HebrewMonth::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

/// Hebrew spelling for a transliterated month name.
///
/// Names outside the table are returned as given.
pub fn month_letters(name: &str) -> &str {
    match name.parse::<HebrewMonth>() {
        Ok(month) => month.letters(),
        Err(_) => {
            tracing::warn!("No Hebrew spelling for month {:?}, printing as-is", name);
            name
        }
    }
}

/// Gregorian month names written in Hebrew, January first
static GREGORIAN_MONTHS: [&str; 12] = [
    "ינואר",
    "פברואר",
    "מרץ",
    "אפריל",
    "מאי",
    "יוני",
    "יולי",
    "אוגוסט",
    "ספטמבר",
    "אוקטובר",
    "נובמבר",
    "דצמבר",
];

/// Hebrew spelling of a Gregorian month, `month0` counting from January = 0
pub fn gregorian_month_letters(month0: u32) -> Option<&'static str> {
    GREGORIAN_MONTHS.get(month0 as usize).copied()
}
