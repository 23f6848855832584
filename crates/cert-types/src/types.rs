/// Calendar input for the formatters. `month0()` gives the zero-based month.
pub type GregorianDate = chrono::NaiveDate;

/// A date in the Hebrew calendar as reported by a calendar collaborator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HebrewCalendarDate {
    pub day: u32,
    /// Transliterated month name, e.g. "Tevet" or "Adar II"
    pub month_name: String,
    pub year: i32,
}

impl HebrewCalendarDate {
    pub fn new(day: u32, month_name: impl Into<String>, year: i32) -> Self {
        Self {
            day,
            month_name: month_name.into(),
            year,
        }
    }
}

/// One positioned run of text, consumed immediately by the drawing surface.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawInstruction {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Name of the font the run was measured with
    pub font: String,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parse `#RRGGBB` (leading `#` optional). Anything shorter is black.
    pub fn from_hex(color: &str) -> Self {
        let hex = color.trim_start_matches('#');
        if hex.len() < 6 || !hex.is_ascii() {
            return Self::BLACK;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or(0) as f32 / 255.0
        };
        Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// The person the certificate is issued for.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub private_number: String,
}
