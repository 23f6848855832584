//! AcroForm text fields
//!
//! Templates that carry form fields are filled by field name instead of
//! being overlaid with positioned text.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::error::OverlayError;
use crate::overlay::FieldValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl FieldKind {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"Tx" => FieldKind::Text,
            b"Btn" => FieldKind::Button,
            b"Ch" => FieldKind::Choice,
            b"Sig" => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: ObjectId,
    /// Fully qualified name, parent names joined with `.`
    pub name: String,
    pub kind: FieldKind,
}

/// Terminal fields of the document's AcroForm, in tree order
pub fn form_fields(doc: &Document) -> Vec<FormField> {
    let mut fields = Vec::new();

    let Ok(catalog) = doc.catalog() else {
        return fields;
    };
    let Some(acroform) = catalog.get(b"AcroForm").ok().and_then(|o| resolve_dict(doc, o)) else {
        return fields;
    };
    let Ok(Object::Array(roots)) = acroform.get(b"Fields").map(|o| resolve(doc, o)) else {
        return fields;
    };

    for root in roots {
        if let Object::Reference(id) = root {
            collect_fields(doc, *id, None, None, &mut fields, 0);
        }
    }
    fields
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, obj).as_dict().ok()
}

fn collect_fields(
    doc: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_kind: Option<FieldKind>,
    out: &mut Vec<FormField>,
    depth: usize,
) {
    // guards against cyclic Kids references
    if depth > 32 {
        return;
    }
    let Ok(dict) = doc.get_object(id).and_then(Object::as_dict) else {
        return;
    };

    let partial = match dict.get(b"T") {
        Ok(Object::String(bytes, _)) => Some(decode_text_string(bytes)),
        _ => None,
    };
    let name = match (parent_name, partial) {
        (Some(parent), Some(partial)) => format!("{}.{}", parent, partial),
        (None, Some(partial)) => partial,
        (Some(parent), None) => parent.to_string(),
        (None, None) => String::new(),
    };
    let kind = match dict.get(b"FT") {
        Ok(Object::Name(ft)) => Some(FieldKind::from_name(ft)),
        _ => inherited_kind,
    };

    let kids: Vec<ObjectId> = match dict.get(b"Kids").map(|o| resolve(doc, o)) {
        Ok(Object::Array(kids)) => kids
            .iter()
            .filter_map(|k| k.as_reference().ok())
            .collect(),
        _ => Vec::new(),
    };

    // kids without a /T are widget annotations of this field
    let named_kids: Vec<ObjectId> = kids
        .into_iter()
        .filter(|kid| {
            doc.get_object(*kid)
                .and_then(Object::as_dict)
                .map(|d| d.has(b"T"))
                .unwrap_or(false)
        })
        .collect();

    if named_kids.is_empty() {
        out.push(FormField {
            id,
            name,
            kind: kind.unwrap_or(FieldKind::Unknown),
        });
    } else {
        for kid in named_kids {
            collect_fields(doc, kid, Some(&name), kind, out, depth + 1);
        }
    }
}

/// PDF text strings are UTF-16BE when they start with a byte order mark,
/// PDFDocEncoding (treated as Latin-1) otherwise
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn encode_text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Value for a form field, chosen by keywords in its name.
///
/// Checked in order: `id`/`ID` → id number, `private`/`personal` → private
/// number, `date`/`Date` → beginning date.
pub fn value_for_field<'a>(field_name: &str, values: &'a FieldValues) -> Option<&'a str> {
    let key = if field_name.contains("id") || field_name.contains("ID") {
        "id_number"
    } else if field_name.contains("private") || field_name.contains("personal") {
        "private_number"
    } else if field_name.contains("date") || field_name.contains("Date") {
        "beginning_date"
    } else {
        return None;
    };
    values.get(key).map(String::as_str)
}

/// Set `/V` on every text field whose name maps to a value
pub fn fill_form_fields(doc: &mut Document, values: &FieldValues) -> Result<usize, OverlayError> {
    let mut filled = 0;

    for field in form_fields(doc) {
        tracing::info!("Processing field: {}", field.name);
        if field.kind != FieldKind::Text {
            continue;
        }
        let Some(value) = value_for_field(&field.name, values) else {
            continue;
        };

        let dict = doc
            .get_object_mut(field.id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| OverlayError::OperationError(e.to_string()))?;
        dict.set(
            "V",
            Object::String(encode_text_string(value), StringFormat::Literal),
        );
        tracing::info!("  -> Set to: {}", value);
        filled += 1;
    }

    if filled > 0 {
        set_need_appearances(doc)?;
    }
    Ok(filled)
}

/// Ask viewers to regenerate field appearances from the new values
fn set_need_appearances(doc: &mut Document) -> Result<(), OverlayError> {
    let acroform_ref = doc
        .catalog()
        .ok()
        .and_then(|c| c.get(b"AcroForm").ok())
        .and_then(|o| o.as_reference().ok());

    let acroform = match acroform_ref {
        Some(id) => doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| OverlayError::OperationError(e.to_string()))?,
        None => doc
            .catalog_mut()
            .map_err(|e| OverlayError::OperationError(e.to_string()))?
            .get_mut(b"AcroForm")
            .and_then(Object::as_dict_mut)
            .map_err(|e| OverlayError::OperationError(e.to_string()))?,
    };
    acroform.set("NeedAppearances", Object::Boolean(true));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use pretty_assertions::assert_eq;

    fn values() -> FieldValues {
        [
            ("id_number", "308334127"),
            ("private_number", "7600783"),
            ("beginning_date", "25/12/2025"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn form_document() -> Document {
        let mut doc = Document::with_version("1.7");
        let id_field = doc.add_object(dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal("soldier_id"),
        });
        let personal = doc.add_object(dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal("personal_number"),
        });
        let start = doc.add_object(dictionary! {
            "T" => Object::string_literal("startDate"),
        });
        let group = doc.add_object(dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal("service"),
            "Kids" => vec![Object::Reference(start)],
        });
        let agree = doc.add_object(dictionary! {
            "FT" => "Btn",
            "T" => Object::string_literal("agree"),
        });
        let acroform = doc.add_object(dictionary! {
            "Fields" => vec![
                Object::Reference(id_field),
                Object::Reference(personal),
                Object::Reference(group),
                Object::Reference(agree),
            ],
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => acroform,
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    #[test]
    fn test_form_fields_qualifies_names_and_inherits_type() {
        let doc = form_document();
        let fields = form_fields(&doc);
        let summary: Vec<(&str, FieldKind)> =
            fields.iter().map(|f| (f.name.as_str(), f.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("soldier_id", FieldKind::Text),
                ("personal_number", FieldKind::Text),
                ("service.startDate", FieldKind::Text),
                ("agree", FieldKind::Button),
            ]
        );
    }

    #[test]
    fn test_document_without_acroform_has_no_fields() {
        let mut doc = Document::with_version("1.7");
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        assert!(form_fields(&doc).is_empty());
    }

    #[test]
    fn test_value_for_field_keyword_order() {
        let vals = values();
        assert_eq!(value_for_field("soldier_id", &vals), Some("308334127"));
        assert_eq!(value_for_field("personal_number", &vals), Some("7600783"));
        assert_eq!(value_for_field("startDate", &vals), Some("25/12/2025"));
        assert_eq!(value_for_field("signature", &vals), None);
        // "id" wins over "date"
        assert_eq!(value_for_field("id_date", &vals), Some("308334127"));
    }

    #[test]
    fn test_fill_form_fields_sets_text_values() {
        let mut doc = form_document();
        let filled = fill_form_fields(&mut doc, &values()).unwrap();
        assert_eq!(filled, 3);

        let fields = form_fields(&doc);
        let id = fields.iter().find(|f| f.name == "soldier_id").unwrap().id;
        let field = doc.get_object(id).unwrap().as_dict().unwrap();
        assert!(matches!(field.get(b"V"), Ok(Object::String(v, _)) if v == b"308334127"));

        let catalog = doc.catalog().unwrap();
        let acroform_id = catalog.get(b"AcroForm").unwrap().as_reference().unwrap();
        let acroform = doc.get_object(acroform_id).unwrap().as_dict().unwrap();
        assert!(matches!(
            acroform.get(b"NeedAppearances"),
            Ok(Object::Boolean(true))
        ));
    }

    #[test]
    fn test_text_string_round_trip_for_hebrew() {
        let encoded = encode_text_string("כהן");
        assert_eq!(&encoded[..2], &[0xFE, 0xFF]);
        assert_eq!(decode_text_string(&encoded), "כהן");
        assert_eq!(decode_text_string(b"plain"), "plain");
    }
}
