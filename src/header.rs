//! Letterhead – two logos side by side with the school's address block
//! centred beneath them.

use crate::assets::{AssetSource, Logo};
use crate::layout::LayoutCursor;
use crate::layout_config::ImageAsset;

/// Height every logo is scaled to; width follows the aspect ratio.
pub const LOGO_HEIGHT: f32 = 40.0;
/// Distance from the page top to the top edge of the logos.
const LOGO_TOP_OFFSET: f32 = 60.0;
/// Distance from the page top to the first address line without logos.
pub const FALLBACK_TOP_OFFSET: f32 = 80.0;
const HEADER_FONT_SIZE: f32 = 9.0;
const HEADER_LINE_GAP: f32 = 2.0;

pub const LETTERHEAD_LINES: [&str; 3] = [
    "Herseltsesteenweg 4, 3200 Aarschot",
    "016 30 08 20",
    "KBO 0409 949 615 / RPR Leuven",
];

/// Which header variant was drawn, and where it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderResult {
    WithLogos { bottom_y: f32 },
    TextOnly { bottom_y: f32 },
}

impl HeaderResult {
    /// Cursor position right below the last address line.
    pub fn bottom_y(&self) -> f32 {
        match *self {
            HeaderResult::WithLogos { bottom_y } | HeaderResult::TextOnly { bottom_y } => bottom_y,
        }
    }

    pub fn has_logos(&self) -> bool {
        matches!(self, HeaderResult::WithLogos { .. })
    }
}

/// Draw the letterhead at the top of the cursor's current page.
///
/// If either logo cannot be fetched or decoded, no logo is drawn at all and
/// the address block moves up to a fixed offset from the page top. The
/// cursor is left at the returned bottom position.
pub fn render_header(cursor: &mut LayoutCursor, assets: &dyn AssetSource) -> HeaderResult {
    let page_height = cursor.page_height();

    let result = match load_logos(assets) {
        Ok((left, right)) => {
            let logo_y = page_height - LOGO_TOP_OFFSET - LOGO_HEIGHT;
            let left_width = scaled_width(&left);
            let right_width = scaled_width(&right);

            let left_x = cursor.margin_left();
            let right_x = cursor.page_width() - cursor.margin_right() - right_width;

            cursor.register_image(Logo::Arcadia.image_id(), left);
            cursor.register_image(Logo::Sma.image_id(), right);
            cursor.place_image(Logo::Arcadia.image_id(), left_x, logo_y, left_width, LOGO_HEIGHT);
            cursor.place_image(Logo::Sma.image_id(), right_x, logo_y, right_width, LOGO_HEIGHT);

            let bottom_y = draw_address_block(cursor, logo_y + LOGO_HEIGHT - HEADER_FONT_SIZE);
            HeaderResult::WithLogos { bottom_y }
        }
        Err(reason) => {
            log::warn!("letterhead without logos: {reason}");
            let bottom_y = draw_address_block(cursor, page_height - FALLBACK_TOP_OFFSET);
            HeaderResult::TextOnly { bottom_y }
        }
    };

    cursor.set_y(result.bottom_y());
    result
}

/// Fetch both logos, then decode both. Any failure rejects the pair.
fn load_logos(assets: &dyn AssetSource) -> Result<(ImageAsset, ImageAsset), String> {
    let fetched = (assets.fetch(Logo::Arcadia), assets.fetch(Logo::Sma));
    let (left, right) = match fetched {
        (Ok(left), Ok(right)) => (left, right),
        (Err(e), _) | (_, Err(e)) => return Err(e.to_string()),
    };
    Ok((decode_logo(Logo::Arcadia, left)?, decode_logo(Logo::Sma, right)?))
}

fn decode_logo(logo: Logo, bytes: Vec<u8>) -> Result<ImageAsset, String> {
    let img = image::load_from_memory(&bytes)
        .map_err(|e| format!("logo {logo:?} could not be decoded: {e}"))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(format!("logo {logo:?} has no pixels"));
    }
    Ok(ImageAsset {
        px_width: img.width(),
        px_height: img.height(),
        bytes,
    })
}

fn scaled_width(asset: &ImageAsset) -> f32 {
    asset.px_width as f32 / asset.px_height as f32 * LOGO_HEIGHT
}

/// Draw the address lines centred on the page, first baseline at `start_y`.
fn draw_address_block(cursor: &mut LayoutCursor, start_y: f32) -> f32 {
    let face = cursor.fonts().regular;
    let page_width = cursor.page_width();
    let mut y = start_y;
    for line in LETTERHEAD_LINES {
        let width = face.measure_text_width(line, HEADER_FONT_SIZE);
        let x = (page_width - width) / 2.0;
        cursor.place_text(line, x, y, HEADER_FONT_SIZE, false);
        y -= HEADER_FONT_SIZE + HEADER_LINE_GAP;
    }
    y
}
