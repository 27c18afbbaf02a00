//! Pipeline – ties together the letterhead, the claim content builders,
//! rendering and attachment merging into a single function call.

use chrono::NaiveDate;

use crate::assets::AssetSource;
use crate::error::ClaimError;
use crate::fonts::FontPair;
use crate::forms::{fields, BuildContext, FormValues};
use crate::header::{render_header, HeaderResult};
use crate::layout::LayoutCursor;
use crate::layout_config::DocumentLayout;
use crate::merge::merge_attachments;
use crate::pagination::{Margins, Overflow, PageGeometry};
use crate::render::render_pdf;

/// Vertical gap between the letterhead and the first line of content.
pub const HEADER_CONTENT_GAP: f32 = 30.0;

/// US Letter, the page size the claim forms were designed on.
pub const LETTER_WIDTH_PT: f32 = 612.0;
pub const LETTER_HEIGHT_PT: f32 = 792.0;

/// Configuration for assembling a claim document.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Document title embedded in the PDF metadata (default: "claim-forge output").
    pub title: String,
    /// Page width in points (default: US Letter = 612).
    pub page_width: f32,
    /// Page height in points (default: US Letter = 792).
    pub page_height: f32,
    /// Page margins in points (default: 50 on every side).
    pub margins: Margins,
    /// What happens when content reaches the bottom margin.
    pub overflow: Overflow,
    /// Date printed on the claim (default: today, local time).
    pub issue_date: NaiveDate,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            title: "claim-forge output".to_string(),
            page_width: LETTER_WIDTH_PT,
            page_height: LETTER_HEIGHT_PT,
            margins: Margins::default(),
            overflow: Overflow::Paginate,
            issue_date: chrono::Local::now().date_naive(),
        }
    }
}

impl AssemblyConfig {
    /// Legacy single-page output: overflowing content is clipped.
    pub fn single_page() -> Self {
        Self {
            overflow: Overflow::Clip,
            ..Self::default()
        }
    }

    pub fn with_issue_date(mut self, issue_date: NaiveDate) -> Self {
        self.issue_date = issue_date;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.page_width, self.page_height, self.margins)
    }
}

/// Lay out the claim without rendering it.
///
/// Returns the drawn layout and which header variant was used.
pub fn assemble_layout(
    values: &FormValues,
    config: &AssemblyConfig,
    assets: &dyn AssetSource,
) -> Result<(DocumentLayout, HeaderResult), ClaimError> {
    let form_type = values.form_type()?;

    let mut cursor = LayoutCursor::new(config.geometry(), FontPair::default(), config.overflow);
    let header = render_header(&mut cursor, assets);
    cursor.set_y(header.bottom_y() - HEADER_CONTENT_GAP);

    let ctx = BuildContext {
        issue_date: config.issue_date,
    };
    form_type.builder().build(&mut cursor, values, &ctx);
    log::debug!(
        "laid out {form_type} claim on {} page(s), logos: {}",
        cursor.page_count(),
        header.has_logos()
    );

    Ok((cursor.finish(config.title.clone()), header))
}

/// Full pipeline without attachments: form values → PDF bytes.
pub fn assemble(
    values: &FormValues,
    config: &AssemblyConfig,
    assets: &dyn AssetSource,
) -> Result<Vec<u8>, ClaimError> {
    let (layout, _) = assemble_layout(values, config, assets)?;
    render_pdf(&layout)
}

/// Assemble the claim and append every non-empty attachment found in the
/// `attachments` field.
pub fn generate_claim_document(
    values: &FormValues,
    config: &AssemblyConfig,
    assets: &dyn AssetSource,
) -> Result<Vec<u8>, ClaimError> {
    let base = assemble(values, config, assets)?;

    let attachments: Vec<_> = values
        .attachments(fields::ATTACHMENTS)
        .iter()
        .filter(|a| {
            if a.is_empty() {
                log::debug!("dropping empty attachment '{}'", a.name);
            }
            !a.is_empty()
        })
        .cloned()
        .collect();

    if attachments.is_empty() {
        return Ok(base);
    }
    merge_attachments(&base, &attachments)
}
