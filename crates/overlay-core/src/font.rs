//! TrueType fonts: measurement and embedding
//!
//! Text is drawn with an Identity-H encoded Type0 font, so every run is
//! written as a sequence of two-byte glyph ids. Glyph usage is collected
//! while drawing and the width and ToUnicode tables are emitted once, when
//! the document is saved.

use std::collections::{BTreeMap, HashMap};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::OverlayError;

/// Width measurement for a font at a given size, in PDF points
pub trait FontMetrics {
    fn name(&self) -> &str;

    fn width_of_text_at_size(&self, text: &str, size: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    /// Horizontal advance in font units
    pub advance: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceMetrics {
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
}

/// A parsed TrueType font program ready for embedding
#[derive(Debug, Clone)]
pub struct FontProgram {
    name: String,
    data: Vec<u8>,
    metrics: FaceMetrics,
    notdef: Glyph,
    glyphs: HashMap<char, Glyph>,
}

impl FontProgram {
    /// Parse a single-face font with TrueType (`glyf`) outlines.
    ///
    /// Collections and CFF-flavoured OpenType are rejected: the program is
    /// embedded whole as `FontFile2`.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, OverlayError> {
        if let Some(count) = ttf_parser::fonts_in_collection(&data) {
            return Err(OverlayError::FontError(format!(
                "Font collections are not supported ({} faces)",
                count
            )));
        }

        let (name, metrics, notdef, glyphs) = {
            let face = ttf_parser::Face::parse(&data, 0)
                .map_err(|e| OverlayError::FontError(e.to_string()))?;

            let raw = face.raw_face();
            if [b"CFF ", b"CFF2"]
                .into_iter()
                .any(|tag| raw.table(ttf_parser::Tag::from_bytes(tag)).is_some())
            {
                return Err(OverlayError::FontError(
                    "CFF-flavoured OpenType is not supported".to_string(),
                ));
            }

            let name = face
                .names()
                .into_iter()
                .filter(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
                .find_map(|n| n.to_string())
                .map(|n| sanitize_font_name(&n))
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "EmbeddedFont".to_string());

            let bbox = face.global_bounding_box();
            let metrics = FaceMetrics {
                units_per_em: face.units_per_em().max(1),
                ascent: face.ascender(),
                descent: face.descender(),
                cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
                bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            };

            let notdef = Glyph {
                id: 0,
                advance: face
                    .glyph_hor_advance(ttf_parser::GlyphId(0))
                    .unwrap_or(0),
            };

            let mut glyphs = HashMap::new();
            if let Some(cmap) = face.tables().cmap {
                for subtable in cmap.subtables {
                    if !subtable.is_unicode() {
                        continue;
                    }
                    subtable.codepoints(|cp| {
                        let (Some(ch), Some(gid)) = (char::from_u32(cp), subtable.glyph_index(cp))
                        else {
                            return;
                        };
                        glyphs.entry(ch).or_insert(Glyph {
                            id: gid.0,
                            advance: face.glyph_hor_advance(gid).unwrap_or(0),
                        });
                    });
                }
            }

            (name, metrics, notdef, glyphs)
        };

        if glyphs.is_empty() {
            return Err(OverlayError::FontError(format!(
                "{} has no Unicode character map",
                name
            )));
        }

        tracing::info!("Loaded font {} ({} glyphs mapped)", name, glyphs.len());

        Ok(Self {
            name,
            data,
            metrics,
            notdef,
            glyphs,
        })
    }

    /// Glyph for `ch`, or `.notdef` when the font has no mapping for it
    pub fn glyph(&self, ch: char) -> Glyph {
        self.glyphs.get(&ch).copied().unwrap_or(self.notdef)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn units_per_em(&self) -> u16 {
        self.metrics.units_per_em
    }

    /// Font units scaled to the 1000-unit glyph space PDF uses
    fn to_pdf_units(&self, value: i32) -> i64 {
        (value as f64 * 1000.0 / self.metrics.units_per_em as f64).round() as i64
    }

    /// Write the font program and its dictionaries into `doc`, returning the
    /// Type0 font object. `used` maps each drawn glyph id to the character
    /// it was drawn for.
    pub(crate) fn embed(&self, doc: &mut Document, used: &BTreeMap<u16, char>) -> ObjectId {
        let font_file_id = doc.add_object(Stream::new(
            dictionary! { "Length1" => self.data.len() as i64 },
            self.data.clone(),
        ));

        let m = &self.metrics;
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.name.clone().into_bytes()),
            "Flags" => 4,
            "FontBBox" => vec![
                self.to_pdf_units(m.bbox[0] as i32).into(),
                self.to_pdf_units(m.bbox[1] as i32).into(),
                self.to_pdf_units(m.bbox[2] as i32).into(),
                self.to_pdf_units(m.bbox[3] as i32).into(),
            ],
            "ItalicAngle" => 0,
            "Ascent" => self.to_pdf_units(m.ascent as i32),
            "Descent" => self.to_pdf_units(m.descent as i32),
            "CapHeight" => self.to_pdf_units(m.cap_height as i32),
            "StemV" => 80,
            "FontFile2" => font_file_id,
        });

        let mut widths = Vec::with_capacity(used.len() * 2);
        for (&gid, &ch) in used {
            let advance = if gid == 0 {
                self.notdef.advance
            } else {
                self.glyph(ch).advance
            };
            widths.push(Object::Integer(gid as i64));
            widths.push(Object::Array(vec![Object::Integer(
                self.to_pdf_units(advance as i32),
            )]));
        }

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.name.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => self.to_pdf_units(self.notdef.advance as i32),
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(
            Dictionary::new(),
            to_unicode_cmap(used).into_bytes(),
        ));

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.name.clone().into_bytes()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        })
    }

    /// Identity-H string for `text`; records each glyph in `used`
    pub(crate) fn encode(&self, text: &str, used: &mut BTreeMap<u16, char>) -> Object {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let glyph = self.glyph(ch);
            if glyph.id == 0 {
                tracing::warn!("Font {} has no glyph for {:?}", self.name, ch);
            }
            used.entry(glyph.id).or_insert(ch);
            bytes.extend_from_slice(&glyph.id.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }

    #[cfg(test)]
    pub(crate) fn synthetic(name: &str) -> Self {
        let mut glyphs = HashMap::new();
        let chars = (' '..='~').chain('\u{05D0}'..='\u{05EA}');
        for (idx, ch) in chars.enumerate() {
            let advance = if ch == ' ' { 250 } else { 500 };
            glyphs.insert(
                ch,
                Glyph {
                    id: idx as u16 + 1,
                    advance,
                },
            );
        }
        Self {
            name: name.to_string(),
            data: b"synthetic font program".to_vec(),
            metrics: FaceMetrics {
                units_per_em: 1000,
                ascent: 800,
                descent: -200,
                cap_height: 700,
                bbox: [0, -200, 1000, 800],
            },
            notdef: Glyph {
                id: 0,
                advance: 600,
            },
            glyphs,
        }
    }
}

impl FontMetrics for FontProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn width_of_text_at_size(&self, text: &str, size: f64) -> f64 {
        let units: u64 = text.chars().map(|ch| self.glyph(ch).advance as u64).sum();
        units as f64 * size / self.metrics.units_per_em as f64
    }
}

/// Keep only characters that are safe in a PDF name
fn sanitize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    // .notdef stands for every missing character, so it maps to none
    let entries: Vec<(u16, char)> = used
        .iter()
        .filter(|(g, _)| **g != 0)
        .map(|(g, c)| (*g, *c))
        .collect();

    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    // bfchar blocks hold at most 100 entries
    for chunk in entries.chunks(100) {
        out.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            out.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}
