//! Fill a certificate template

use crate::document::{CertificateDocument, FontHandle};
use crate::error::OverlayError;
use crate::font::FontProgram;
use crate::overlay::{FieldValues, OverlayPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// The template's own form fields were filled
    FormFields,
    /// Values were drawn as positioned text
    Overlay,
}

#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub mode: FillMode,
    /// Form fields set, or text runs drawn
    pub written: usize,
    pub pdf: Vec<u8>,
}

/// Draw every field of `plan` onto the document with an already embedded font
pub fn apply_overlay(
    doc: &mut CertificateDocument,
    font: FontHandle,
    plan: &OverlayPlan,
    values: &FieldValues,
) -> Result<usize, OverlayError> {
    let page_height = doc.page_size(plan.page)?.height;
    let program = doc
        .font(font)
        .ok_or_else(|| OverlayError::OperationError(format!("Unknown font handle {:?}", font)))?;
    let instructions = plan.draw_instructions(values, program, page_height);

    let color = plan.style.rgb();
    for instruction in &instructions {
        doc.draw_text(plan.page, instruction, font, color)?;
    }
    Ok(instructions.len())
}

/// Fill the template with `values`.
///
/// Templates with AcroForm fields are filled by field name; all others get
/// the overlay plan drawn with `font`.
pub fn fill_certificate(
    template: &[u8],
    font: FontProgram,
    plan: &OverlayPlan,
    values: &FieldValues,
) -> Result<FillOutcome, OverlayError> {
    let mut doc = CertificateDocument::load(template)?;

    let fields = doc.form_fields();
    tracing::info!("Total form fields: {}", fields.len());

    let (mode, written) = if fields.is_empty() {
        tracing::info!("No form fields, adding text overlays");
        let handle = doc.embed_font(font);
        (
            FillMode::Overlay,
            apply_overlay(&mut doc, handle, plan, values)?,
        )
    } else {
        (FillMode::FormFields, doc.fill_form_fields(values)?)
    };

    let pdf = doc.save()?;
    Ok(FillOutcome { mode, written, pdf })
}
