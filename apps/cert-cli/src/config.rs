//! Layout configuration
//!
//! A TOML file names the template, the font, and where each value is drawn.
//! Without a file the built-in layout of the reserve-service approval form
//! is used.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use overlay_core::{OverlayField, OverlayPlan, OverlayStyle};
use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    /// Fields drawn when the template has no form fields
    #[serde(default = "default_fields")]
    pub fields: Vec<OverlayField>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: DocumentConfig::default(),
            fields: default_fields(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use cert_cli::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [document]
    ///     font_size = 11
    ///
    ///     [[fields]]
    ///     name = "id_number"
    ///     x = 75
    ///     y = 195
    ///     anchor = "top"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.fields.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// The overlay plan described by this configuration
    pub fn plan(&self) -> OverlayPlan {
        OverlayPlan {
            page: self.document.page,
            style: OverlayStyle {
                font_size: self.document.font_size,
                color: self.document.color.clone(),
            },
            fields: self.fields.clone(),
        }
    }
}

/// Files and shared drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_template")]
    pub template: PathBuf,
    #[serde(default = "default_font")]
    pub font: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// 1-indexed page the fields are drawn on (default: 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Font size in points (default: 10)
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Text color as `#RRGGBB` (default: black)
    #[serde(default = "default_color")]
    pub color: String,
    /// Days between the service beginning date and the issue date (default: 6)
    #[serde(default = "default_days_before")]
    pub days_before: u32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            font: default_font(),
            output: default_output(),
            page: default_page(),
            font_size: default_font_size(),
            color: default_color(),
            days_before: default_days_before(),
        }
    }
}

fn default_template() -> PathBuf {
    PathBuf::from("PDF Approval Document.pdf")
}

fn default_font() -> PathBuf {
    PathBuf::from("public/assets/LibertinusSerif-Regular.ttf")
}

fn default_output() -> PathBuf {
    PathBuf::from("output-filled.pdf")
}

fn default_page() -> u32 {
    1
}

fn default_font_size() -> f64 {
    10.0
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_days_before() -> u32 {
    6
}

/// Coordinates of the approval form, in points from the bottom-left corner
/// unless anchored to the top
fn default_fields() -> Vec<OverlayField> {
    vec![
        OverlayField::new("hebrew_date", 42.8, 788.0),
        OverlayField::new("english_date", 45.6, 777.0).rtl_tokens(),
        OverlayField::new("id_number", 80.7, 195.0).from_top(),
        OverlayField::new("first_name", 227.8, 195.0).from_top(),
        OverlayField::new("last_name", 360.8, 195.0).from_top(),
        OverlayField::new("private_number", 485.7, 195.0).from_top(),
        OverlayField::new("beginning_date", 326.3, 584.0),
    ]
}
