//! Hebrew numeral letters for 1..=30 and the gershayim mark.

/// The mark placed inside a multi-letter numeral.
pub const GERSHAYIM: char = '"';

/// Letters for the numbers 0..=30. Index 0 is empty: there is no numeral for zero.
static NUMERALS: [&str; 31] = [
    "", "א", "ב", "ג", "ד", "ה", "ו", "ז", "ח", "ט", "י", "יא", "יב", "יג", "יד", "טו", "טז",
    "יז", "יח", "יט", "כ", "כא", "כב", "כג", "כד", "כה", "כו", "כז", "כח", "כט", "ל",
];

/// Letters for `n`, or `None` outside 1..=30.
pub fn numeral(n: i64) -> Option<&'static str> {
    if !(1..=30).contains(&n) {
        return None;
    }
    NUMERALS.get(n as usize).copied()
}

/// Insert the gershayim mark before the last character of `letters`.
///
/// Strings of one character or fewer are returned unchanged.
pub fn insert_gershayim(letters: &str) -> String {
    match letters.char_indices().last() {
        Some((idx, _)) if idx > 0 => {
            let mut out = String::with_capacity(letters.len() + 1);
            out.push_str(&letters[..idx]);
            out.push(GERSHAYIM);
            out.push_str(&letters[idx..]);
            out
        }
        _ => letters.to_string(),
    }
}
