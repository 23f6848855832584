use std::fs;
use std::path::Path;

use anyhow::Context;
use cert_types::PersonalDetails;

/// Read a personal profile (`firstName`, `lastName`, `privateNumber`,
/// `idNumber`) from a JSON file
pub fn load_profile<P: AsRef<Path>>(path: P) -> anyhow::Result<PersonalDetails> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse profile: {}", path.display()))
}
