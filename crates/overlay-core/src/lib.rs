//! Certificate overlay rendering
//!
//! Draws field values onto a fixed PDF template using lopdf, with an embedded
//! TrueType font for measurement and glyph encoding.
//!
//! - [`layout`]: right-to-left token placement on a left-to-right surface
//! - [`overlay`]: the field plan (coordinates, sizes, layout per field)
//! - [`document`]: template loading, inspection, deferred drawing, saving
//! - [`forms`]: AcroForm enumeration and filling
//! - [`apply`]: the fill routine tying them together

pub mod apply;
pub mod document;
pub mod error;
pub mod font;
pub mod forms;
pub mod layout;
pub mod overlay;

pub use apply::{apply_overlay, fill_certificate, FillMode, FillOutcome};
pub use document::{CertificateDocument, FontHandle, FontSummary, PageSize};
pub use error::OverlayError;
pub use font::{FontMetrics, FontProgram};
pub use forms::{FieldKind, FormField};
pub use layout::{layout_literal, layout_rtl, tokenize, visual_order};
pub use overlay::{Anchor, FieldLayout, FieldValues, OverlayField, OverlayPlan, OverlayStyle};
