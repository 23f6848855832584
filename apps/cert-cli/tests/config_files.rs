use std::io::Write;

use cert_cli::{certificate_values, load_profile, Config};
use cert_types::GregorianDate;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_profile_uses_camel_case_keys() {
    let file = temp_file(
        r#"{
            "firstName": "דביר",
            "lastName": "כהן",
            "privateNumber": "7600783",
            "idNumber": "308334127"
        }"#,
    );

    let details = load_profile(file.path()).unwrap();
    assert_eq!(details.first_name, "דביר");
    assert_eq!(details.private_number, "7600783");
    assert_eq!(details.id_number, "308334127");
}

#[test]
fn test_profile_missing_keys_default_to_empty() {
    let file = temp_file(r#"{ "lastName": "לוי" }"#);
    let details = load_profile(file.path()).unwrap();
    assert_eq!(details.last_name, "לוי");
    assert!(details.first_name.is_empty());
}

#[test]
fn test_malformed_profile_is_an_error() {
    let file = temp_file("firstName = nope");
    let err = load_profile(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse profile"));
}

#[test]
fn test_layout_file_drives_values() {
    let file = temp_file(
        r#"
            [document]
            days_before = 3

            [[fields]]
            name = "beginning_date"
            x = 326.3
            y = 584
        "#,
    );
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.fields.len(), 1);

    let details = load_profile(temp_file("{}").path()).unwrap();
    let date = GregorianDate::from_ymd_opt(2026, 1, 2).unwrap();
    let values = certificate_values(&details, date, config.document.days_before);
    assert_eq!(values["beginning_date"], "30/12/2025");
}
