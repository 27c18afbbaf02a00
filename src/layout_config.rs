//! Layout config – the intermediate representation between the layout cursor
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each page.
//!
//! Coordinates are PDF user space: origin at the bottom-left of the page, `y`
//! growing upwards, units in points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fonts::FontFace;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
    /// Image payloads referenced by [`DrawItem::Image`], keyed by id.
    #[serde(skip)]
    pub images: BTreeMap<String, ImageAsset>,
}

/// One page of content, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub items: Vec<DrawItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawItem {
    /// A single line of text; `y` is the baseline.
    Text(TextRun),
    /// A stroked rectangle; `(x, y)` is the bottom-left corner.
    Rect(StrokedRect),
    /// An image placement; `(x, y)` is the bottom-left corner.
    Image(ImagePlacement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub face: FontFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub image_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Encoded image bytes plus the pixel size they decode to.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub px_width: u32,
    pub px_height: u32,
}

impl DocumentLayout {
    pub fn new(title: impl Into<String>, page_width_pt: f32, page_height_pt: f32) -> Self {
        Self {
            title: title.into(),
            page_width_pt,
            page_height_pt,
            pages: Vec::new(),
            images: BTreeMap::new(),
        }
    }

    fn default_title() -> String {
        "claim".to_string()
    }

    /// All text runs of one page, in drawing order.
    pub fn texts(&self, page_index: usize) -> impl Iterator<Item = &TextRun> {
        self.pages
            .get(page_index)
            .into_iter()
            .flat_map(|p| p.items.iter())
            .filter_map(|item| match item {
                DrawItem::Text(t) => Some(t),
                _ => None,
            })
    }

    /// All rectangles of one page, in drawing order.
    pub fn rects(&self, page_index: usize) -> impl Iterator<Item = &StrokedRect> {
        self.pages
            .get(page_index)
            .into_iter()
            .flat_map(|p| p.items.iter())
            .filter_map(|item| match item {
                DrawItem::Rect(r) => Some(r),
                _ => None,
            })
    }

    /// Number of image placements across every page.
    pub fn image_placements(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .filter(|item| matches!(item, DrawItem::Image(_)))
            .count()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
