//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API). Also promotes a raster image to a
//! single-page PDF for the attachment merger.

use std::collections::HashMap;

use printpdf::*;

use crate::error::ClaimError;
use crate::layout_config::*;

/// Points to millimetres.
const PT_TO_MM: f32 = 0.352778;

/// Render a DocumentLayout into PDF bytes.
///
/// Images whose bytes printpdf cannot decode are skipped with a `log::warn`.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, ClaimError> {
    let page_w = Mm(layout.page_width_pt * PT_TO_MM);
    let page_h = Mm(layout.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&layout.title);

    // ── Pre-register all images ────────────────────────────────────────────
    let mut xobjects: HashMap<&str, (XObjectId, &ImageAsset)> = HashMap::new();
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();

    for (id, asset) in &layout.images {
        let raw = match RawImage::decode_from_bytes(&asset.bytes, &mut img_warnings) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping image '{id}': PDF encode error: {e}");
                continue;
            }
        };
        let xobj_id = doc.add_image(&raw);
        xobjects.insert(id.as_str(), (xobj_id, asset));
    }

    // ── Render pages ──────────────────────────────────────────────────────
    let mut pages = Vec::with_capacity(layout.pages.len());
    for page_layout in &layout.pages {
        let mut ops = Vec::new();
        for item in &page_layout.items {
            render_item(&mut ops, item, &xobjects);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if bytes.is_empty() {
        return Err(ClaimError::Render("printpdf produced an empty document".into()));
    }
    Ok(bytes)
}

/// Wrap an encoded raster image in a one-page PDF of exactly its pixel size
/// (1 px = 1 pt, no scaling).
///
/// The declared `format` is enforced: bytes that do not decode as that format
/// are an error, even if they are some other valid image.
pub fn image_page_pdf(
    name: &str,
    bytes: &[u8],
    format: ::image::ImageFormat,
) -> Result<Vec<u8>, ClaimError> {
    let decoded = ::image::load_from_memory_with_format(bytes, format).map_err(|source| {
        ClaimError::ImageDecode {
            name: name.to_string(),
            format: format_label(format),
            source,
        }
    })?;
    let (px_width, px_height) = (decoded.width() as f32, decoded.height() as f32);

    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(bytes, &mut warnings).map_err(|e| {
        ClaimError::Attachment {
            name: name.to_string(),
            reason: format!("PDF encode error: {e}"),
        }
    })?;

    let mut doc = PdfDocument::new(name);
    let xobj_id = doc.add_image(&raw);
    let ops = vec![Op::UseXobject {
        id: xobj_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            dpi: Some(72.0),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            rotate: None,
        },
    }];
    let page = PdfPage::new(Mm(px_width * PT_TO_MM), Mm(px_height * PT_TO_MM), ops);
    doc.with_pages(vec![page]);

    log::debug!("wrapped image '{name}' ({px_width}x{px_height} px) in a single-page PDF");
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

fn format_label(format: ::image::ImageFormat) -> &'static str {
    match format {
        ::image::ImageFormat::Jpeg => "JPEG",
        ::image::ImageFormat::Png => "PNG",
        _ => "image",
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
///
/// The returned String is not valid UTF-8 as soon as it holds a byte at or
/// above 0x80. It must go straight into `TextItem::Text` and never be read as
/// a `str`. This relies on printpdf copying builtin-font text into the content
/// stream byte for byte without inspecting it; move to a byte-level text API
/// if printpdf grows one.
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF. Sound only while the
    // value is handed to printpdf untouched; printpdf passes these bytes
    // straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn black() -> Color {
    Color::Rgb(Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn render_item(
    ops: &mut Vec<Op>,
    item: &DrawItem,
    xobjects: &HashMap<&str, (XObjectId, &ImageAsset)>,
) {
    match item {
        DrawItem::Text(run) => {
            let font = run.face.builtin();
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(run.x),
                    y: Pt(run.y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(run.font_size),
                font,
            });
            ops.push(Op::SetFillColor { col: black() });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(&run.text))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
        DrawItem::Rect(rect) => {
            ops.push(Op::SetOutlineColor { col: black() });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(rect.stroke_width),
            });
            let (x1, y1) = (rect.x, rect.y);
            let (x2, y2) = (rect.x + rect.width, rect.y + rect.height);
            ops.push(Op::DrawLine {
                line: Line {
                    points: vec![point(x1, y1), point(x2, y1), point(x2, y2), point(x1, y2)],
                    is_closed: true,
                },
            });
        }
        DrawItem::Image(placement) => {
            let Some((xobj_id, asset)) = xobjects.get(placement.image_id.as_str()) else {
                log::warn!("Skipping placement of unregistered image '{}'", placement.image_id);
                return;
            };
            // At dpi=72 printpdf renders 1 px = 1 pt, so
            // scale = desired_pt / px_dim.
            let scale_x = if asset.px_width > 0 {
                placement.width / asset.px_width as f32
            } else {
                1.0
            };
            let scale_y = if asset.px_height > 0 {
                placement.height / asset.px_height as f32
            } else {
                1.0
            };
            ops.push(Op::UseXobject {
                id: xobj_id.clone(),
                transform: XObjectTransform {
                    translate_x: Some(Pt(placement.x)),
                    translate_y: Some(Pt(placement.y)),
                    dpi: Some(72.0),
                    scale_x: Some(scale_x),
                    scale_y: Some(scale_y),
                    rotate: None,
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontFace;

    #[test]
    fn render_empty_layout() {
        let layout = DocumentLayout::new("empty", 612.0, 792.0);
        let bytes = render_pdf(&layout).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn render_text_and_rect() {
        let mut layout = DocumentLayout::new("t", 612.0, 792.0);
        layout.pages.push(PageLayout {
            page_index: 0,
            items: vec![
                DrawItem::Text(TextRun {
                    text: "Bedrag: € 12,50".into(),
                    x: 50.0,
                    y: 700.0,
                    font_size: 11.0,
                    face: FontFace::TimesRoman,
                }),
                DrawItem::Rect(StrokedRect {
                    x: 46.0,
                    y: 680.0,
                    width: 520.0,
                    height: 30.0,
                    stroke_width: 1.0,
                }),
            ],
        });
        let bytes = render_pdf(&layout).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn euro_sign_reaches_content_stream_as_winansi_byte() {
        let mut layout = DocumentLayout::new("t", 612.0, 792.0);
        layout.pages.push(PageLayout {
            page_index: 0,
            items: vec![DrawItem::Text(TextRun {
                text: "Bedrag: € 9,99".into(),
                x: 50.0,
                y: 700.0,
                font_size: 11.0,
                face: FontFace::TimesRoman,
            })],
        });
        let bytes = render_pdf(&layout).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let page_id = doc.get_pages()[&1];
        let content =
            lopdf::content::Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let mut shown: Vec<u8> = Vec::new();
        for op in content.operations {
            for operand in op.operands {
                match operand {
                    lopdf::Object::String(b, _) => shown.extend(b),
                    lopdf::Object::Array(items) => {
                        for item in items {
                            if let lopdf::Object::String(b, _) = item {
                                shown.extend(b);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        assert!(
            shown.windows(3).any(|w| w == [b' ', 0x80, b' ']),
            "euro sign not written as 0x80: {shown:?}"
        );
    }

    #[test]
    fn winlatin_maps_euro_sign() {
        assert_eq!(to_winlatin("€ 5").as_bytes(), &[0x80, b' ', b'5']);
        assert_eq!(to_winlatin("é").as_bytes(), &[0xE9]);
        assert_eq!(to_winlatin("→").as_bytes(), b"?");
    }

    #[test]
    fn image_with_wrong_declared_type_fails() {
        let err = image_page_pdf("bon.jpg", b"definitely not a jpeg", ::image::ImageFormat::Jpeg)
            .unwrap_err();
        assert!(matches!(err, ClaimError::ImageDecode { format: "JPEG", .. }));
    }
}
