//! Label document model
//!
//! Documents arrive from the designer as loosely-typed JSON. Missing fields
//! take defaults and numbers are clamped into range instead of rejected;
//! only an unknown element `type` fails deserialization.

use crate::barcode::make_ean13;
use crate::label::geometry::{normalize_rotation, Frame};
use crate::label::placeholder::{placeholders, substitute};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CANVAS_MIN_SIZE: f64 = 50.0;
pub const CANVAS_MAX_SIZE: f64 = 4000.0;
pub const ELEMENT_MIN_SIZE: f64 = 1.0;
pub const ELEMENT_MAX_SIZE: f64 = 4000.0;
pub const FONT_SIZE_MIN: f64 = 4.0;
pub const FONT_SIZE_MAX: f64 = 400.0;
pub const STROKE_WIDTH_MAX: f64 = 50.0;

/// Clamp into `[min, max]`; NaN and infinities become `min`
pub fn clamp_value(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            background: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextElement {
    pub id: String,
    #[serde(flatten)]
    pub frame: Frame,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub color: String,
}

impl Default for TextElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            frame: Frame::default(),
            text: String::new(),
            font_size: 14.0,
            font_family: "Arial".to_string(),
            bold: false,
            italic: false,
            align: TextAlign::Left,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectElement {
    pub id: String,
    #[serde(flatten)]
    pub frame: Frame,
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub corner_radius: f64,
}

impl Default for RectElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            frame: Frame::default(),
            stroke: "#000000".to_string(),
            stroke_width: 1.0,
            fill: None,
            corner_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeFormat {
    #[default]
    Ean13,
    Code128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeElement {
    pub id: String,
    #[serde(flatten)]
    pub frame: Frame,
    pub value: String,
    pub format: BarcodeFormat,
    pub show_text: bool,
}

impl Default for BarcodeElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            frame: Frame {
                width: 200.0,
                height: 80.0,
                ..Frame::default()
            },
            value: String::new(),
            format: BarcodeFormat::Ean13,
            show_text: true,
        }
    }
}

/// A positioned element, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LabelElement {
    Text(TextElement),
    Rect(RectElement),
    Barcode(BarcodeElement),
}

impl LabelElement {
    pub fn id(&self) -> &str {
        match self {
            LabelElement::Text(e) => &e.id,
            LabelElement::Rect(e) => &e.id,
            LabelElement::Barcode(e) => &e.id,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            LabelElement::Text(e) => &e.frame,
            LabelElement::Rect(e) => &e.frame,
            LabelElement::Barcode(e) => &e.frame,
        }
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        match self {
            LabelElement::Text(e) => &mut e.frame,
            LabelElement::Rect(e) => &mut e.frame,
            LabelElement::Barcode(e) => &mut e.frame,
        }
    }

    /// The templated string carried by this element, if any
    fn template(&self) -> Option<&str> {
        match self {
            LabelElement::Text(e) => Some(&e.text),
            LabelElement::Barcode(e) => Some(&e.value),
            LabelElement::Rect(_) => None,
        }
    }

    /// Clamp every numeric field into its allowed range
    pub fn normalize(&mut self) {
        normalize_frame(self.frame_mut());
        match self {
            LabelElement::Text(e) => {
                e.font_size = clamp_value(e.font_size, FONT_SIZE_MIN, FONT_SIZE_MAX);
            }
            LabelElement::Rect(e) => {
                e.stroke_width = clamp_value(e.stroke_width, 0.0, STROKE_WIDTH_MAX);
                let max_radius = e.frame.width.min(e.frame.height) / 2.0;
                e.corner_radius = clamp_value(e.corner_radius, 0.0, max_radius);
            }
            LabelElement::Barcode(_) => {}
        }
    }
}

fn normalize_frame(frame: &mut Frame) {
    frame.x = if frame.x.is_finite() { frame.x } else { 0.0 };
    frame.y = if frame.y.is_finite() { frame.y } else { 0.0 };
    frame.width = clamp_value(frame.width, ELEMENT_MIN_SIZE, ELEMENT_MAX_SIZE);
    frame.height = clamp_value(frame.height, ELEMENT_MIN_SIZE, ELEMENT_MAX_SIZE);
    frame.rotation = normalize_rotation(frame.rotation);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub canvas: Canvas,
    pub elements: Vec<LabelElement>,
}

/// Outcome of filling a document's placeholders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDocument {
    pub document: LabelDocument,
    /// Every field referenced anywhere in the document
    pub placeholders: Vec<String>,
    /// Referenced fields with no supplied value
    pub unresolved: Vec<String>,
}

impl LabelDocument {
    /// Clamp the canvas and every element; applying it twice changes nothing
    pub fn normalize(&mut self) {
        self.canvas.width = clamp_value(self.canvas.width, CANVAS_MIN_SIZE, CANVAS_MAX_SIZE);
        self.canvas.height = clamp_value(self.canvas.height, CANVAS_MIN_SIZE, CANVAS_MAX_SIZE);
        for element in &mut self.elements {
            element.normalize();
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Distinct placeholder fields across all elements, in document order
    pub fn placeholders(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for template in self.elements.iter().filter_map(LabelElement::template) {
            for field in placeholders(template) {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        }
        fields
    }

    /// Substitute `values` into text and barcode elements, then normalize
    /// EAN-13 barcode values. The document is normalized as well.
    pub fn resolve(&self, values: &HashMap<String, String>) -> ResolvedDocument {
        let mut document = self.clone().normalized();
        let fields = document.placeholders();
        let mut unresolved: Vec<String> = Vec::new();

        for element in &mut document.elements {
            match element {
                LabelElement::Text(e) => {
                    let out = substitute(&e.text, values);
                    e.text = out.text;
                    merge_unique(&mut unresolved, out.unresolved);
                }
                LabelElement::Barcode(e) => {
                    let out = substitute(&e.value, values);
                    let complete = out.unresolved.is_empty();
                    e.value = out.text;
                    merge_unique(&mut unresolved, out.unresolved);
                    // A value still holding placeholders is left for the designer to show
                    if complete && !e.value.is_empty() && e.format == BarcodeFormat::Ean13 {
                        e.value = make_ean13(&e.value);
                    }
                }
                LabelElement::Rect(_) => {}
            }
        }

        ResolvedDocument {
            document,
            placeholders: fields,
            unresolved,
        }
    }
}

fn merge_unique(into: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}
