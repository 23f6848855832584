//! Overlay plans
//!
//! A plan lists the fields drawn onto the template: where each value goes,
//! at what size, and whether it is laid out as right-to-left tokens. One plan
//! replaces per-field drawing code.

use std::collections::BTreeMap;

use cert_types::{DrawInstruction, Rgb};
use serde::{Deserialize, Serialize};

use crate::font::FontMetrics;
use crate::layout::{layout_literal, layout_rtl, tokenize};

/// Field name → text to draw
pub type FieldValues = BTreeMap<String, String>;

/// Edge of the page the field's `y` is measured from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// `y` is the baseline in PDF coordinates
    #[default]
    Bottom,
    /// `y` is the distance below the top edge
    Top,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldLayout {
    /// Draw the value as one run
    #[default]
    Literal,
    /// Split on whitespace and draw tokens in right-to-left order
    RtlTokens,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayField {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub anchor: Anchor,
    /// Overrides the plan's font size
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub layout: FieldLayout,
}

impl OverlayField {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            anchor: Anchor::Bottom,
            size: None,
            layout: FieldLayout::Literal,
        }
    }

    pub fn from_top(mut self) -> Self {
        self.anchor = Anchor::Top;
        self
    }

    pub fn rtl_tokens(mut self) -> Self {
        self.layout = FieldLayout::RtlTokens;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Baseline in PDF coordinates for a page of the given height
    pub fn baseline(&self, page_height: f64) -> f64 {
        match self.anchor {
            Anchor::Bottom => self.y,
            Anchor::Top => page_height - self.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub font_size: f64,
    /// `#RRGGBB`
    pub color: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            color: "#000000".to_string(),
        }
    }
}

impl OverlayStyle {
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlan {
    /// 1-indexed page the fields are drawn on
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub style: OverlayStyle,
    #[serde(default)]
    pub fields: Vec<OverlayField>,
}

fn default_page() -> u32 {
    1
}

impl Default for OverlayPlan {
    fn default() -> Self {
        Self {
            page: default_page(),
            style: OverlayStyle::default(),
            fields: Vec::new(),
        }
    }
}

impl OverlayPlan {
    /// Draw instructions for every field that has a value.
    ///
    /// Fields without a value are skipped.
    pub fn draw_instructions<F>(
        &self,
        values: &FieldValues,
        font: &F,
        page_height: f64,
    ) -> Vec<DrawInstruction>
    where
        F: FontMetrics + ?Sized,
    {
        let mut instructions = Vec::new();

        for field in &self.fields {
            let Some(value) = values.get(&field.name) else {
                tracing::warn!("No value for field {}, skipping", field.name);
                continue;
            };
            let size = field.size.unwrap_or(self.style.font_size);
            let y = field.baseline(page_height);

            tracing::info!("Adding {} at position: x={}, y={}", field.name, field.x, y);

            match field.layout {
                FieldLayout::Literal => {
                    instructions.push(layout_literal(value, field.x, y, font, size));
                }
                FieldLayout::RtlTokens => {
                    let tokens = tokenize(value);
                    instructions.extend(layout_rtl(&tokens, field.x, y, font, size));
                }
            }
        }

        instructions
    }
}
