//! Layout cursor – a vertical write position moving down the page, with the
//! primitives the claim builders draw with.
//!
//! The cursor never touches a PDF surface. Every primitive appends a
//! [`DrawItem`] to the page set, and [`LayoutCursor::finish`] freezes the
//! result into a [`DocumentLayout`] for the renderer.

use std::collections::BTreeMap;

use crate::fonts::{wrap_text, FontPair};
use crate::layout_config::{
    DocumentLayout, DrawItem, ImageAsset, ImagePlacement, StrokedRect, TextRun,
};
use crate::pagination::{Overflow, PageGeometry, PageSet};

/// Padding between a framed section's first line and its top border.
pub const SECTION_PAD_TOP: f32 = 6.0;
/// Padding between a framed section's last line and its bottom border.
pub const SECTION_PAD_BOTTOM: f32 = 4.0;
/// Padding on the left and right of a framed section.
pub const SECTION_PAD_SIDES: f32 = 4.0;

/// Font selection and vertical spacing for one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub bold: bool,
    pub size: f32,
    pub line_gap: f32,
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn line_gap(mut self, line_gap: f32) -> Self {
        self.line_gap = line_gap;
        self
    }

    /// How far one line in this style moves the cursor down.
    pub fn advance(&self) -> f32 {
        self.size + self.line_gap
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            size: 11.0,
            line_gap: 4.0,
        }
    }
}

/// The top of a framed section, captured before its first line is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionFrame {
    pub page: usize,
    pub top_y: f32,
}

/// Rectangle bounding the lines drawn between `top_y` and `bottom_y`.
pub fn section_rect(margin_left: f32, content_width: f32, top_y: f32, bottom_y: f32) -> StrokedRect {
    let box_top = top_y + SECTION_PAD_TOP;
    let box_bottom = bottom_y - SECTION_PAD_BOTTOM;
    StrokedRect {
        x: margin_left - SECTION_PAD_SIDES,
        y: box_bottom,
        width: content_width + SECTION_PAD_SIDES * 2.0,
        height: box_top - box_bottom,
        stroke_width: 1.0,
    }
}

pub struct LayoutCursor {
    y: f32,
    geometry: PageGeometry,
    content_width: f32,
    fonts: FontPair,
    overflow: Overflow,
    pages: PageSet,
    images: BTreeMap<String, ImageAsset>,
}

impl LayoutCursor {
    /// A cursor on a fresh first page, positioned at the top margin.
    pub fn new(geometry: PageGeometry, fonts: FontPair, overflow: Overflow) -> Self {
        Self {
            y: geometry.content_top(),
            content_width: geometry.content_width(),
            geometry,
            fonts,
            overflow,
            pages: PageSet::new(),
            images: BTreeMap::new(),
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Reposition the cursor explicitly.
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Move the cursor down by `dy` points without drawing.
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn margin_left(&self) -> f32 {
        self.geometry.margins.left
    }

    pub fn margin_right(&self) -> f32 {
        self.geometry.margins.right
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn page_width(&self) -> f32 {
        self.geometry.width
    }

    pub fn page_height(&self) -> f32 {
        self.geometry.height
    }

    pub fn fonts(&self) -> FontPair {
        self.fonts
    }

    pub fn page_index(&self) -> usize {
        self.pages.current_index()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Draw one line at the left margin and move down by `size + line_gap`.
    ///
    /// A blank line draws nothing but still moves the cursor.
    pub fn draw_text(&mut self, line: &str, style: TextStyle) {
        if !line.trim().is_empty() {
            self.break_if_past_bottom();
            let face = self.fonts.select(style.bold);
            self.pages.push(DrawItem::Text(TextRun {
                text: line.to_string(),
                x: self.geometry.margins.left,
                y: self.y,
                font_size: style.size,
                face,
            }));
        }
        self.y -= style.advance();
    }

    fn break_if_past_bottom(&mut self) {
        if self.overflow == Overflow::Paginate && self.y < self.geometry.content_bottom() {
            self.pages.break_page(self.y);
            self.y = self.geometry.content_top();
        }
    }

    /// Word-wrap `text` at `max_chars` and draw each line.
    pub fn wrap_and_draw(&mut self, text: &str, max_chars: usize, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        for line in wrap_text(text, max_chars) {
            self.draw_text(&line, style);
        }
    }

    /// Frame the lines drawn between `top_y` and `bottom_y` on the current page.
    pub fn draw_section_box(&mut self, top_y: f32, bottom_y: f32) {
        let rect = section_rect(self.geometry.margins.left, self.content_width, top_y, bottom_y);
        self.pages.push(DrawItem::Rect(rect));
    }

    /// Capture the top of a section `lift` points above the cursor.
    ///
    /// A cursor already past the bottom margin moves to a new page first, so
    /// the section starts where its first line will be drawn.
    pub fn begin_section(&mut self, lift: f32) -> SectionFrame {
        self.break_if_past_bottom();
        SectionFrame {
            page: self.pages.current_index(),
            top_y: self.y + lift,
        }
    }

    /// Frame everything drawn since `frame` was captured, one box per page.
    pub fn end_section(&mut self, frame: SectionFrame) {
        let spans = self
            .pages
            .section_spans(frame.page, frame.top_y, self.y, &self.geometry);
        for span in spans {
            let rect = section_rect(
                self.geometry.margins.left,
                self.content_width,
                span.top_y,
                span.bottom_y,
            );
            self.pages.push_on(span.page, DrawItem::Rect(rect));
        }
    }

    /// Place text at an absolute position on the current page.
    pub fn place_text(&mut self, text: &str, x: f32, y: f32, size: f32, bold: bool) {
        let face = self.fonts.select(bold);
        self.pages.push(DrawItem::Text(TextRun {
            text: text.to_string(),
            x,
            y,
            font_size: size,
            face,
        }));
    }

    /// Make an encoded image available to [`place_image`](Self::place_image).
    pub fn register_image(&mut self, id: impl Into<String>, asset: ImageAsset) {
        self.images.insert(id.into(), asset);
    }

    /// Place a registered image with its bottom-left corner at `(x, y)`.
    pub fn place_image(&mut self, id: &str, x: f32, y: f32, width: f32, height: f32) {
        self.pages.push(DrawItem::Image(ImagePlacement {
            image_id: id.to_string(),
            x,
            y,
            width,
            height,
        }));
    }

    /// Freeze the drawn pages into a layout ready for rendering.
    pub fn finish(self, title: impl Into<String>) -> DocumentLayout {
        let mut layout = DocumentLayout::new(title, self.geometry.width, self.geometry.height);
        layout.pages = self.pages.into_pages();
        layout.images = self.images;
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontFace;
    use crate::pagination::Margins;

    fn cursor(overflow: Overflow) -> LayoutCursor {
        let geometry = PageGeometry::new(612.0, 792.0, Margins::default());
        LayoutCursor::new(geometry, FontPair::default(), overflow)
    }

    #[test]
    fn draw_text_advances_by_size_and_gap() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(700.0);
        c.draw_text("Hello", TextStyle::default());
        assert_eq!(c.y(), 685.0);
        c.draw_text("Title", TextStyle::bold().size(18.0).line_gap(10.0));
        assert_eq!(c.y(), 657.0);

        let layout = c.finish("t");
        let texts: Vec<_> = layout.texts(0).collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].y, 700.0);
        assert_eq!(texts[0].x, 50.0);
        assert_eq!(texts[0].face, FontFace::TimesRoman);
        assert_eq!(texts[1].face, FontFace::TimesBold);
    }

    #[test]
    fn blank_line_moves_cursor_without_drawing() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(500.0);
        c.draw_text("   ", TextStyle::default());
        c.draw_text("", TextStyle::default().size(9.0));
        assert_eq!(c.y(), 500.0 - 15.0 - 13.0);
        assert_eq!(c.finish("t").texts(0).count(), 0);
    }

    #[test]
    fn cursor_moves_by_sum_of_contributions() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(740.0);
        let styles = [
            ("one", TextStyle::default()),
            ("", TextStyle::default().size(8.0)),
            ("three", TextStyle::bold().size(18.0).line_gap(10.0)),
            (" ", TextStyle::default().line_gap(0.0)),
        ];
        let mut expected = 740.0;
        for (line, style) in styles {
            c.draw_text(line, style);
            expected -= style.advance();
        }
        c.wrap_and_draw("alpha beta gamma delta", 11, TextStyle::default());
        expected -= 2.0 * 15.0;
        assert!((c.y() - expected).abs() < 1e-4);
    }

    #[test]
    fn wrap_and_draw_empty_is_noop() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(400.0);
        c.wrap_and_draw("", 90, TextStyle::default());
        assert_eq!(c.y(), 400.0);
    }

    #[test]
    fn section_box_bounds_drawn_lines() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(600.0);
        let top = c.y();
        c.draw_text("a", TextStyle::default());
        c.draw_text("b", TextStyle::default());
        let bottom = c.y();
        c.draw_section_box(top, bottom);

        let layout = c.finish("t");
        let rect = layout.rects(0).next().copied().unwrap();
        assert_eq!(rect.x, 46.0);
        assert_eq!(rect.width, 512.0 + 8.0);
        assert_eq!(rect.y, bottom - 4.0);
        assert_eq!(rect.height, (top + 6.0) - (bottom - 4.0));
        assert_eq!(rect.stroke_width, 1.0);
    }

    #[test]
    fn overflow_breaks_to_new_page() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(70.0);
        c.draw_text("fits", TextStyle::default()); // y -> 55
        c.draw_text("fits too", TextStyle::default()); // y -> 40
        c.draw_text("next page", TextStyle::default());
        assert_eq!(c.page_index(), 1);
        assert_eq!(c.y(), 742.0 - 15.0);

        let layout = c.finish("t");
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.texts(1).next().unwrap().y, 742.0);
    }

    #[test]
    fn clip_keeps_drawing_below_the_page() {
        let mut c = cursor(Overflow::Clip);
        c.set_y(20.0);
        for _ in 0..5 {
            c.draw_text("lost", TextStyle::default());
        }
        let layout = c.finish("t");
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.texts(0).last().unwrap().y < 0.0);
    }

    #[test]
    fn section_straddling_a_break_gets_a_box_per_page() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(80.0);
        let frame = c.begin_section(5.0);
        for _ in 0..4 {
            c.draw_text("line", TextStyle::default());
        }
        c.end_section(frame);

        let layout = c.finish("t");
        assert_eq!(layout.pages.len(), 2);
        let first = layout.rects(0).next().copied().unwrap();
        let second = layout.rects(1).next().copied().unwrap();
        assert_eq!(first.y + first.height, 85.0 + 6.0);
        assert_eq!(second.y + second.height, 742.0 + 6.0);
    }

    #[test]
    fn section_opened_below_bottom_margin_starts_on_next_page() {
        let mut c = cursor(Overflow::Paginate);
        c.set_y(60.0);
        c.draw_text("last line", TextStyle::default()); // y -> 45
        c.advance(20.0); // y -> 25
        let frame = c.begin_section(5.0);
        assert_eq!(frame.page, 1);
        assert_eq!(frame.top_y, 742.0 + 5.0);
        c.draw_text("inside", TextStyle::default());
        c.end_section(frame);

        let layout = c.finish("t");
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.rects(0).count(), 0);
        assert_eq!(layout.texts(0).count(), 1);
        let rect = layout.rects(1).next().copied().unwrap();
        assert_eq!(rect.y + rect.height, 747.0 + 6.0);
        assert_eq!(rect.y, 742.0 - 15.0 - 4.0);
    }

    #[test]
    fn section_in_clip_mode_stays_on_one_page() {
        let mut c = cursor(Overflow::Clip);
        c.set_y(25.0);
        let frame = c.begin_section(5.0);
        c.draw_text("clipped", TextStyle::default());
        c.end_section(frame);
        let layout = c.finish("t");
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.rects(0).count(), 1);
    }
}
