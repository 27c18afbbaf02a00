//! Pagination – page geometry, the overflow policy and the set of pages the
//! layout cursor writes into.
//!
//! Handles:
//! - page-content versus margin geometry
//! - breaking to a fresh page when a line would land below the bottom margin
//! - splitting a framed section that straddles one or more page breaks

use serde::{Deserialize, Serialize};

use crate::layout_config::{DrawItem, PageLayout};

/// Default page margins in points.
pub const PAGE_MARGIN_PT: f32 = 50.0;

/// What to do when content reaches the bottom margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overflow {
    /// Continue on a new page, cursor reset to the top margin.
    #[default]
    Paginate,
    /// Keep drawing on the single page; content past the bottom edge is lost.
    Clip,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(margin: f32) -> Self {
        Self {
            left: margin,
            right: margin,
            top: margin,
            bottom: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(PAGE_MARGIN_PT)
    }
}

/// Page size plus margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    /// Horizontal room between the left and right margin.
    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// First baseline on a continuation page.
    pub fn content_top(&self) -> f32 {
        self.height - self.margins.top
    }

    /// Lowest baseline that is still inside the content area.
    pub fn content_bottom(&self) -> f32 {
        self.margins.bottom
    }
}

/// The vertical extent of one framed section on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpan {
    pub page: usize,
    pub top_y: f32,
    pub bottom_y: f32,
}

/// Pages under construction, plus the cursor position each closed page was
/// left at.
#[derive(Debug)]
pub struct PageSet {
    pages: Vec<PageLayout>,
    left_at: Vec<f32>,
}

impl PageSet {
    /// A page set holding one empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            left_at: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Append an item to the page currently being written.
    pub fn push(&mut self, item: DrawItem) {
        let index = self.current_index();
        self.push_on(index, item);
    }

    /// Append an item to an already started page.
    pub fn push_on(&mut self, page: usize, item: DrawItem) {
        if let Some(layout) = self.pages.get_mut(page) {
            layout.items.push(item);
        }
    }

    /// Close the current page at cursor position `y` and open the next one.
    pub fn break_page(&mut self, y: f32) -> usize {
        self.left_at.push(y);
        let index = self.pages.len();
        self.pages.push(PageLayout {
            page_index: index,
            items: Vec::new(),
        });
        log::debug!("page break at y={y:.1}, continuing on page {}", index + 1);
        index
    }

    /// Split the span from `(start_page, top_y)` to the cursor at
    /// `(current page, bottom_y)` into one span per page.
    pub fn section_spans(
        &self,
        start_page: usize,
        top_y: f32,
        bottom_y: f32,
        geometry: &PageGeometry,
    ) -> Vec<SectionSpan> {
        let end_page = self.current_index();
        if start_page >= end_page {
            return vec![SectionSpan {
                page: end_page,
                top_y,
                bottom_y,
            }];
        }

        let mut spans = Vec::with_capacity(end_page - start_page + 1);
        for page in start_page..=end_page {
            let top = if page == start_page {
                top_y
            } else {
                geometry.content_top()
            };
            let bottom = if page == end_page {
                bottom_y
            } else {
                self.left_at
                    .get(page)
                    .copied()
                    .unwrap_or_else(|| geometry.content_bottom())
            };
            spans.push(SectionSpan {
                page,
                top_y: top,
                bottom_y: bottom,
            });
        }
        spans
    }

    pub fn into_pages(self) -> Vec<PageLayout> {
        self.pages
    }

    pub fn pages(&self) -> &[PageLayout] {
        &self.pages
    }
}

impl Default for PageSet {
    fn default() -> Self {
        Self::new()
    }
}
