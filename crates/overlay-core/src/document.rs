//! Template document: load, inspect, draw text, save
//!
//! Drawing is deferred. `draw_text` records the run and the glyphs it uses;
//! `save` embeds each font once with the glyph widths actually drawn and
//! appends one content stream per page.

use std::collections::{BTreeMap, BTreeSet};

use cert_types::{DrawInstruction, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::OverlayError;
use crate::font::FontProgram;
use crate::forms::{self, FormField};
use crate::overlay::FieldValues;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// A font dictionary found in the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSummary {
    pub base_font: Option<String>,
    pub subtype: Option<String>,
}

/// Index of a font registered with [`CertificateDocument::embed_font`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontHandle(usize);

struct FontSlot {
    program: FontProgram,
    used: BTreeMap<u16, char>,
}

struct TextRun {
    font: FontHandle,
    size: f64,
    x: f64,
    y: f64,
    color: Rgb,
    encoded: Object,
}

pub struct CertificateDocument {
    doc: Document,
    fonts: Vec<FontSlot>,
    runs: BTreeMap<u32, Vec<TextRun>>,
}

impl CertificateDocument {
    /// Load a PDF from raw bytes
    pub fn load(bytes: &[u8]) -> Result<Self, OverlayError> {
        let doc = Document::load_mem(bytes).map_err(|e| OverlayError::ParseError(e.to_string()))?;
        tracing::info!("Template loaded, size: {} bytes", bytes.len());
        Ok(Self {
            doc,
            fonts: Vec::new(),
            runs: BTreeMap::new(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page object ID for a 1-indexed page number
    pub fn page_id(&self, page: u32) -> Result<ObjectId, OverlayError> {
        self.doc
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(OverlayError::PageNotFound(page))
    }

    /// Width and height of the page's MediaBox, inherited from the page tree
    /// when the page has none. Pages without any MediaBox are US Letter.
    pub fn page_size(&self, page: u32) -> Result<PageSize, OverlayError> {
        let page_id = self.page_id(page)?;
        let mut current = Some(page_id);
        let mut visited = BTreeSet::new();

        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(OverlayError::ParseError("cyclic page tree".to_string()));
            }
            let dict = self
                .doc
                .get_object(id)
                .and_then(Object::as_dict)
                .map_err(|e| OverlayError::ParseError(e.to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox") {
                let [x1, y1, x2, y2] = self.parse_rect(media_box)?;
                return Ok(PageSize {
                    width: x2 - x1,
                    height: y2 - y1,
                });
            }

            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        Ok(PageSize {
            width: 612.0,
            height: 792.0,
        })
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn parse_rect(&self, obj: &Object) -> Result<[f64; 4], OverlayError> {
        let arr = match self.resolve(obj) {
            Object::Array(a) if a.len() == 4 => a,
            _ => {
                return Err(OverlayError::ParseError(
                    "MediaBox is not a 4-element array".to_string(),
                ))
            }
        };

        let mut values = [0.0f64; 4];
        for (i, item) in arr.iter().enumerate() {
            values[i] = match self.resolve(item) {
                Object::Integer(v) => *v as f64,
                Object::Real(v) => *v as f64,
                _ => {
                    return Err(OverlayError::ParseError(
                        "Expected number in MediaBox".to_string(),
                    ))
                }
            };
        }
        Ok(values)
    }

    /// Every `/Type /Font` dictionary in the file
    pub fn fonts(&self) -> Vec<FontSummary> {
        let name_of = |dict: &Dictionary, key: &[u8]| match dict.get(key) {
            Ok(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        };

        self.doc
            .objects
            .values()
            .filter_map(|obj| obj.as_dict().ok())
            .filter(|dict| matches!(dict.get(b"Type"), Ok(Object::Name(t)) if t == b"Font"))
            .map(|dict| FontSummary {
                base_font: name_of(dict, b"BaseFont"),
                subtype: name_of(dict, b"Subtype"),
            })
            .collect()
    }

    pub fn form_fields(&self) -> Vec<FormField> {
        forms::form_fields(&self.doc)
    }

    /// Fill AcroForm text fields from `values`; returns how many were set
    pub fn fill_form_fields(&mut self, values: &FieldValues) -> Result<usize, OverlayError> {
        forms::fill_form_fields(&mut self.doc, values)
    }

    pub fn embed_font(&mut self, program: FontProgram) -> FontHandle {
        self.fonts.push(FontSlot {
            program,
            used: BTreeMap::new(),
        });
        FontHandle(self.fonts.len() - 1)
    }

    pub fn font(&self, handle: FontHandle) -> Option<&FontProgram> {
        self.fonts.get(handle.0).map(|slot| &slot.program)
    }

    /// Queue one run of text on `page`
    pub fn draw_text(
        &mut self,
        page: u32,
        instruction: &DrawInstruction,
        font: FontHandle,
        color: Rgb,
    ) -> Result<(), OverlayError> {
        self.page_id(page)?;
        let slot = self.fonts.get_mut(font.0).ok_or_else(|| {
            OverlayError::OperationError(format!("Unknown font handle {}", font.0))
        })?;

        let encoded = slot.program.encode(&instruction.text, &mut slot.used);
        self.runs.entry(page).or_default().push(TextRun {
            font,
            size: instruction.size,
            x: instruction.x,
            y: instruction.y,
            color,
            encoded,
        });
        Ok(())
    }

    /// Write pending text and serialize the document
    pub fn save(mut self) -> Result<Vec<u8>, OverlayError> {
        let mut font_ids = BTreeMap::new();
        for (index, slot) in self.fonts.iter().enumerate() {
            if slot.used.is_empty() {
                continue;
            }
            let id = slot.program.embed(&mut self.doc, &slot.used);
            font_ids.insert(FontHandle(index), id);
        }

        let runs = std::mem::take(&mut self.runs);
        for (page, page_runs) in runs {
            let page_id = self.page_id(page)?;
            let mut resource_names = BTreeMap::new();
            for run in &page_runs {
                if resource_names.contains_key(&run.font) {
                    continue;
                }
                let font_id = font_ids.get(&run.font).copied().ok_or_else(|| {
                    OverlayError::OperationError(format!("Font {} was not embedded", run.font.0))
                })?;
                let name = add_font_resource(&mut self.doc, page_id, font_id)?;
                resource_names.insert(run.font, name);
            }

            let content = text_content(&page_runs, &resource_names)?;
            append_page_content(&mut self.doc, page_id, content)?;
            tracing::info!("Drew {} text runs on page {}", page_runs.len(), page);
        }

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| OverlayError::SerializationError(e.to_string()))?;
        tracing::info!("PDF saved, size: {} bytes", output.len());
        Ok(output)
    }
}

fn text_content(
    runs: &[TextRun],
    resource_names: &BTreeMap<FontHandle, String>,
) -> Result<Vec<u8>, OverlayError> {
    // restores the graphics state saved by the stream prepended in append_page_content
    let mut operations = vec![Operation::new("Q", vec![]), Operation::new("q", vec![])];

    for run in runs {
        let name = resource_names.get(&run.font).ok_or_else(|| {
            OverlayError::OperationError(format!("No resource name for font {}", run.font.0))
        })?;
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(name.clone().into_bytes()),
                    Object::Real(run.size as f32),
                ],
            ),
            Operation::new(
                "rg",
                vec![
                    Object::Real(run.color.r),
                    Object::Real(run.color.g),
                    Object::Real(run.color.b),
                ],
            ),
            Operation::new(
                "Td",
                vec![Object::Real(run.x as f32), Object::Real(run.y as f32)],
            ),
            Operation::new("Tj", vec![run.encoded.clone()]),
            Operation::new("ET", vec![]),
        ]);
    }
    operations.push(Operation::new("Q", vec![]));

    Content { operations }
        .encode()
        .map_err(|e| OverlayError::OperationError(e.to_string()))
}

/// The page's resource dictionary, resolved and cloned, falling back to
/// resources inherited from the page tree
fn page_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = Some(page_id);
    let mut visited = BTreeSet::new();
    while let Some(id) = current {
        if !visited.insert(id) {
            tracing::warn!("Cyclic page tree above page {:?}", page_id);
            break;
        }
        let Ok(dict) = doc.get_object(id).and_then(Object::as_dict) else {
            break;
        };
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(res)) => return res.clone(),
            Ok(Object::Reference(res_id)) => {
                if let Ok(res) = doc.get_object(*res_id).and_then(Object::as_dict) {
                    return res.clone();
                }
            }
            _ => {}
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Dictionary::new()
}

/// Register `font_id` in the page's font resources under a fresh name
fn add_font_resource(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<String, OverlayError> {
    let mut resources = page_resources(doc, page_id);
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(fonts)) => fonts.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    };

    let name = (1..)
        .map(|n| format!("FCert{}", n))
        .find(|candidate| !fonts.has(candidate.as_bytes()))
        .unwrap_or_else(|| "FCert".to_string());
    fonts.set(name.clone(), Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| OverlayError::OperationError(e.to_string()))?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(name)
}

/// Append `content` after the page's existing streams, with the existing
/// content wrapped in a saved graphics state
fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), OverlayError> {
    let existing: Vec<Object> = {
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| OverlayError::OperationError(e.to_string()))?;
        match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    };

    let prefix_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(prefix_id));
    contents.extend(existing);
    contents.push(Object::Reference(content_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| OverlayError::OperationError(e.to_string()))?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::dictionary;

    /// One A4 page with a small existing content stream
    pub(crate) fn create_test_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"BT /F1 12 Tf 72 72 Td (template) Tj ET".to_vec(),
        ));
        let helvetica_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => helvetica_id },
            },
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        if let Ok(page) = doc.get_object_mut(page_id) {
            if let Ok(dict) = page.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// One page whose parent node names itself as its own parent
    fn cyclic_page_tree() -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
                "Parent" => pages_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    #[test]
    fn test_page_size_rejects_cyclic_page_tree() {
        let mut buffer = Vec::new();
        cyclic_page_tree().save_to(&mut buffer).unwrap();
        let doc = CertificateDocument::load(&buffer).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(matches!(doc.page_size(1), Err(OverlayError::ParseError(_))));
    }

    #[test]
    fn test_page_resources_stops_at_cycle() {
        let doc = cyclic_page_tree();
        let page_id = *doc.get_pages().get(&1).unwrap();
        assert!(page_resources(&doc, page_id).is_empty());
    }

    fn instruction(text: &str, x: f64, y: f64) -> DrawInstruction {
        DrawInstruction {
            text: text.to_string(),
            x,
            y,
            size: 10.0,
            font: "Test".to_string(),
        }
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            CertificateDocument::load(b"not a pdf"),
            Err(OverlayError::ParseError(_))
        ));
    }

    #[test]
    fn test_page_size_is_inherited_from_page_tree() {
        let doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(
            doc.page_size(1).unwrap(),
            PageSize {
                width: 595.0,
                height: 842.0
            }
        );
    }

    #[test]
    fn test_page_size_missing_page() {
        let doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        assert!(matches!(doc.page_size(2), Err(OverlayError::PageNotFound(2))));
    }

    #[test]
    fn test_fonts_lists_template_fonts() {
        let doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        assert_eq!(
            doc.fonts(),
            vec![FontSummary {
                base_font: Some("Helvetica".to_string()),
                subtype: Some("Type1".to_string()),
            }]
        );
    }

    #[test]
    fn test_draw_on_missing_page_fails() {
        let mut doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        let font = doc.embed_font(FontProgram::synthetic("Test"));
        let result = doc.draw_text(3, &instruction("1", 0.0, 0.0), font, Rgb::BLACK);
        assert!(matches!(result, Err(OverlayError::PageNotFound(3))));
    }

    #[test]
    fn test_save_without_drawing_keeps_pages() {
        let doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        let output = doc.save().unwrap();
        let reloaded = Document::load_mem(&output).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn test_save_embeds_font_and_appends_content() {
        let mut doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        let font = doc.embed_font(FontProgram::synthetic("TestSerif"));
        doc.draw_text(1, &instruction("2025", 45.6, 777.0), font, Rgb::BLACK)
            .unwrap();
        doc.draw_text(1, &instruction("כהן", 360.8, 647.0), font, Rgb::BLACK)
            .unwrap();
        let output = doc.save().unwrap();

        let reloaded = Document::load_mem(&output).unwrap();
        let page_id = *reloaded.get_pages().get(&1).unwrap();
        let page = reloaded.get_object(page_id).unwrap().as_dict().unwrap();

        // q prefix, original stream, overlay stream
        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 3);

        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(b"FCert1"));

        let type0_count = reloaded
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .filter(|d| matches!(d.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Type0"))
            .count();
        assert_eq!(type0_count, 1);

        let overlay_id = contents[2].as_reference().unwrap();
        let stream = reloaded.get_object(overlay_id).unwrap().as_stream().unwrap();
        let content = Content::decode(&stream.content).unwrap();
        let draws = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .count();
        assert_eq!(draws, 2);
    }

    #[test]
    fn test_unused_font_is_not_embedded() {
        let mut doc = CertificateDocument::load(&create_test_pdf()).unwrap();
        doc.embed_font(FontProgram::synthetic("Unused"));
        let output = doc.save().unwrap();
        let reloaded = Document::load_mem(&output).unwrap();
        let has_unused = reloaded
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .any(|d| matches!(d.get(b"BaseFont"), Ok(Object::Name(n)) if n == b"Unused"));
        assert!(!has_unused);
    }
}
