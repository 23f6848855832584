use cert_types::{GregorianDate, PersonalDetails};
use hebrew_date::{
    days_before, format_gregorian_hebrew_month, format_hebrew_date, format_numeric_date,
};
use overlay_core::FieldValues;

/// Every value printed on the certificate, keyed by field name.
///
/// Empty personal details are left out so their fields are skipped.
pub fn certificate_values(
    details: &PersonalDetails,
    issue_date: GregorianDate,
    days_before_issue: u32,
) -> FieldValues {
    let beginning = days_before(issue_date, days_before_issue);

    let mut values = FieldValues::new();
    values.insert("hebrew_date".into(), format_hebrew_date(issue_date));
    values.insert(
        "english_date".into(),
        format_gregorian_hebrew_month(issue_date),
    );
    values.insert("beginning_date".into(), format_numeric_date(beginning));

    for (key, value) in [
        ("id_number", &details.id_number),
        ("first_name", &details.first_name),
        ("last_name", &details.last_name),
        ("private_number", &details.private_number),
    ] {
        if !value.is_empty() {
            values.insert(key.into(), value.clone());
        }
    }

    values
}
