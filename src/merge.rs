//! Attachment merging.
//!
//! Every attachment is normalised to a PDF document (raster images become a
//! single page of their pixel size) and its pages are deep-copied onto the
//! end of the generated claim document with `lopdf`.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::attachment::{AttachmentResource, MediaType};
use crate::error::ClaimError;
use crate::render::image_page_pdf;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against malformed, cyclic `/Parent` chains.
const MAX_TREE_DEPTH: usize = 32;

/// Manages the state of copying objects between two documents.
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    /// Reserve a target id for `source_id` without copying it yet.
    fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);
        new_id
    }

    /// Deep-copy an object and everything it references. Each source object
    /// is copied at most once.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Map before recursing so reference cycles terminate.
        let new_id = self.reserve(source_id);
        let obj = self.source.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;
        self.fill(new_id, new_obj)?;
        Ok(new_id)
    }

    /// Replace the placeholder behind a reserved id.
    fn fill(&mut self, target_id: ObjectId, obj: Object) -> Result<(), lopdf::Error> {
        match self.target.objects.get_mut(&target_id) {
            Some(slot) => {
                *slot = obj;
                Ok(())
            }
            None => Err(lopdf::Error::ObjectNotFound(target_id)),
        }
    }

    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => Ok(Object::Array(
                arr.into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.remap_dictionary(dict)?)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dictionary(stream.dict)?;
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }

    fn remap_dictionary(&mut self, mut dict: Dictionary) -> Result<Dictionary, lopdf::Error> {
        for (_, value) in dict.iter_mut() {
            *value = self.remap_references(value.clone())?;
        }
        Ok(dict)
    }
}

/// Append every attachment, in order, to `base` and serialise the result.
///
/// Any attachment that cannot be read aborts the whole merge; no partial
/// document is returned.
pub fn merge_attachments(
    base: &[u8],
    attachments: &[AttachmentResource],
) -> Result<Vec<u8>, ClaimError> {
    if attachments.is_empty() {
        return Ok(base.to_vec());
    }

    let mut target = Document::load_mem(base).map_err(|e| ClaimError::Attachment {
        name: "claim document".into(),
        reason: format!("generated PDF could not be reloaded: {e}"),
    })?;

    for attachment in attachments {
        let source = attachment_to_pdf(attachment)?;
        let copied = append_pages(&mut target, &source)?;
        if copied == 0 {
            log::warn!("attachment '{}' has no pages; nothing appended", attachment.name);
        } else {
            log::info!(
                "appended {copied} page(s) from '{}' ({})",
                attachment.name,
                attachment.media_type
            );
        }
    }

    log::info!(
        "merged {} attachment(s); document now has {} page(s)",
        attachments.len(),
        target.get_pages().len()
    );

    let mut out = Vec::new();
    target
        .save_to(&mut out)
        .map_err(|e| ClaimError::Serialize(e.to_string()))?;
    Ok(out)
}

/// Load an attachment as a PDF document, promoting raster images to a
/// single page first.
pub fn attachment_to_pdf(attachment: &AttachmentResource) -> Result<Document, ClaimError> {
    let bytes = match attachment.media_type {
        MediaType::Pdf => attachment.data.clone(),
        MediaType::Jpeg => {
            image_page_pdf(&attachment.name, &attachment.data, ::image::ImageFormat::Jpeg)?
        }
        MediaType::Png | MediaType::Other(_) => {
            image_page_pdf(&attachment.name, &attachment.data, ::image::ImageFormat::Png)?
        }
    };
    Document::load_mem(&bytes).map_err(|e| ClaimError::Attachment {
        name: attachment.name.clone(),
        reason: format!("not a readable PDF: {e}"),
    })
}

/// Copy all pages of `source` onto the end of `target`'s page tree.
///
/// Returns the number of pages appended.
pub fn append_pages(target: &mut Document, source: &Document) -> Result<usize, ClaimError> {
    // BTreeMap keyed by page number, so iteration is already in page order.
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    if source_pages.is_empty() {
        return Ok(0);
    }

    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let pages_id = target
        .get_object(root_id)?
        .as_dict()?
        .get(b"Pages")?
        .as_reference()?;

    let mut copier = ObjectCopier::new(source, target);

    // Reserve page ids up front so that references back to a page (link
    // annotations, structure elements) land on the copy rather than pulling
    // in the source page tree.
    let new_ids: Vec<ObjectId> = source_pages
        .iter()
        .map(|&page_id| copier.reserve(page_id))
        .collect();

    for (&page_id, &new_id) in source_pages.iter().zip(&new_ids) {
        let mut page = flatten_page(source, page_id)?;
        page.remove(b"Parent");
        let mut page = copier.remap_dictionary(page)?;
        page.set("Parent", Object::Reference(pages_id));
        copier.fill(new_id, Object::Dictionary(page))?;
    }

    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;
    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let count = pages_dict.get(b"Count")?.as_i64()?;
    kids.extend(new_ids.iter().map(|&id| Object::Reference(id)));
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", count + new_ids.len() as i64);

    Ok(new_ids.len())
}

/// The page dictionary with inherited attributes copied onto it.
fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, ClaimError> {
    let mut page = doc.get_object(page_id)?.as_dict()?.clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            log::warn!("page tree deeper than {MAX_TREE_DEPTH} levels; stopped resolving inherited attributes");
            break;
        }
        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream, StringFormat};

    /// A simple PDF whose pages each show "<prefix> <n>". With `inherit`
    /// the MediaBox and Resources live on the page tree node only.
    fn create_dummy_pdf(num_pages: u32, text_prefix: &str, inherit: bool) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 300.into(), 400.into()];

        let mut page_ids: Vec<Object> = vec![];
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 300.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{text_prefix} {i}").into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !inherit {
                page.set("MediaBox", media_box.clone());
                page.set("Resources", resources_id);
            }
            page_ids.push(doc.add_object(page).into());
        }

        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => num_pages as i64,
        };
        if inherit {
            pages_dict.set("MediaBox", media_box);
            pages_dict.set("Resources", resources_id);
        }
        doc.objects.insert(pages_id, pages_dict.into());

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn to_bytes(mut doc: Document) -> Vec<u8> {
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn page_text(doc: &Document, page_no: u32) -> String {
        let page_id = doc.get_pages()[&page_no];
        String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
    }

    #[test]
    fn append_keeps_page_order() {
        let mut target = create_dummy_pdf(2, "Claim", false);
        let source = create_dummy_pdf(3, "Receipt", false);

        let copied = append_pages(&mut target, &source).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(target.get_pages().len(), 5);
        assert!(page_text(&target, 2).contains("Claim 2"));
        assert!(page_text(&target, 3).contains("Receipt 1"));
        assert!(page_text(&target, 5).contains("Receipt 3"));
    }

    #[test]
    fn inherited_attributes_are_resolved() {
        let mut target = create_dummy_pdf(1, "Claim", false);
        let source = create_dummy_pdf(1, "Scan", true);

        append_pages(&mut target, &source).unwrap();

        let page_id = target.get_pages()[&2];
        let page = target.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 300);
        assert_eq!(media_box[3].as_i64().unwrap(), 400);
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn copied_pages_point_at_target_tree() {
        let mut target = create_dummy_pdf(1, "Claim", false);
        let source = create_dummy_pdf(2, "Receipt", false);
        let objects_before = target.objects.len();

        append_pages(&mut target, &source).unwrap();

        let root_id = target.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let pages_id = target
            .get_object(root_id)
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Pages")
            .unwrap()
            .as_reference()
            .unwrap();
        for (_, page_id) in target.get_pages() {
            let page = target.get_object(page_id).unwrap().as_dict().unwrap();
            assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), pages_id);
        }
        // 2 pages + 2 contents + resources + font; the source page tree is not copied.
        assert_eq!(target.objects.len(), objects_before + 6);
    }

    #[test]
    fn merge_pdf_attachments_in_order() {
        let base = to_bytes(create_dummy_pdf(1, "Claim", false));
        let a = AttachmentResource::new(
            "a.pdf",
            MediaType::Pdf,
            to_bytes(create_dummy_pdf(2, "Alpha", false)),
        );
        let b = AttachmentResource::new(
            "b.pdf",
            MediaType::Pdf,
            to_bytes(create_dummy_pdf(1, "Beta", true)),
        );

        let merged = merge_attachments(&base, &[a, b]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();

        assert_eq!(doc.get_pages().len(), 4);
        assert!(page_text(&doc, 1).contains("Claim 1"));
        assert!(page_text(&doc, 2).contains("Alpha 1"));
        assert!(page_text(&doc, 3).contains("Alpha 2"));
        assert!(page_text(&doc, 4).contains("Beta 1"));
    }

    #[test]
    fn no_attachments_returns_base_unchanged() {
        let base = to_bytes(create_dummy_pdf(1, "Claim", false));
        assert_eq!(merge_attachments(&base, &[]).unwrap(), base);
    }

    #[test]
    fn corrupt_pdf_names_the_attachment() {
        let base = to_bytes(create_dummy_pdf(1, "Claim", false));
        let bad = AttachmentResource::new("kapot.pdf", MediaType::Pdf, b"not a pdf".to_vec());

        let err = merge_attachments(&base, &[bad]).unwrap_err();
        match err {
            ClaimError::Attachment { name, .. } => assert_eq!(name, "kapot.pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_media_type_is_decoded_as_png() {
        let bogus = AttachmentResource::new(
            "scan.tiff",
            MediaType::parse("image/tiff"),
            b"II*\0garbage".to_vec(),
        );
        let err = attachment_to_pdf(&bogus).unwrap_err();
        assert!(matches!(err, ClaimError::ImageDecode { format: "PNG", .. }));
    }
}
