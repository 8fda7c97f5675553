//! Page tree helpers over `lopdf` documents.
//!
//! Pages moved between documents lose their ancestor `Pages` nodes, so any
//! attribute a page inherits from those nodes is copied onto the page first.

use crate::error::{Error, Result};
use crate::geometry::PageDimensions;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Attributes a page may inherit from its ancestors (ISO 32000-1 §7.7.3.4).
pub(crate) const INHERITABLE_ATTRS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Maximum depth followed when walking `/Parent` links.
const MAX_DEPTH: usize = 50;

/// A4 MediaBox used when a document carries none.
pub(crate) const A4_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 595.0, 841.0];

/// Page object ids in document order.
pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Copy inherited attributes onto the page dictionary itself.
///
/// Returns how many attributes were materialized.
pub(crate) fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<usize> {
    let mut missing = Vec::new();
    {
        let page = doc.get_dictionary(page_id)?;
        for attr in INHERITABLE_ATTRS {
            if page.has(attr) {
                continue;
            }
            if let Some(value) = inherited_value(doc, page, attr) {
                missing.push((attr, value));
            }
        }
    }

    let count = missing.len();
    if count > 0 {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        for (attr, value) in missing {
            log::debug!(
                "Page {:?} inheriting /{} from ancestor Pages node",
                page_id,
                String::from_utf8_lossy(attr)
            );
            page.set(attr.to_vec(), value);
        }
    }
    Ok(count)
}

fn inherited_value(doc: &Document, page: &Dictionary, attr: &[u8]) -> Option<Object> {
    let mut node = page;
    for _ in 0..MAX_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(attr) {
            return Some(value.clone());
        }
    }
    log::warn!("Page tree depth exceeded {} levels, stopping", MAX_DEPTH);
    None
}

/// Whether an object is a document catalog or an intermediate page tree node.
pub(crate) fn is_tree_node(object: &Object) -> bool {
    match object.as_dict() {
        Ok(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Catalog") | Ok(b"Pages")
        ),
        Err(_) => false,
    }
}

/// Follow a single indirect reference.
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// MediaBox of a page as four numbers.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4]> {
    let page = doc.get_dictionary(page_id)?;
    let raw = match page.get(b"MediaBox") {
        Ok(object) => resolve(doc, object)?,
        Err(_) => return Ok(A4_MEDIA_BOX),
    };
    let array = raw.as_array()?;
    if array.len() != 4 {
        return Err(Error::InvalidPageTree(format!(
            "MediaBox of page {:?} has {} entries",
            page_id,
            array.len()
        )));
    }
    let mut values = [0.0f64; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = resolve(doc, item)?.as_float()? as f64;
    }
    Ok(values)
}

/// Rendered size of a page: its MediaBox, turned by `/Rotate`.
pub(crate) fn page_dimensions(doc: &Document, page_id: ObjectId) -> Result<PageDimensions> {
    let dims = PageDimensions::from_media_box(media_box(doc, page_id)?);
    let rotate = doc
        .get_dictionary(page_id)?
        .get(b"Rotate")
        .and_then(Object::as_i64)
        .unwrap_or(0);
    if rotate.rem_euclid(180) == 90 {
        Ok(PageDimensions::new(dims.height, dims.width))
    } else {
        Ok(dims)
    }
}

/// Add an empty page object (not yet linked into any `Kids` array).
pub(crate) fn create_blank_page(doc: &mut Document, media_box: [f64; 4], parent_id: ObjectId) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(parent_id));
    page.set(
        "MediaBox",
        Object::Array(media_box.iter().map(|v| Object::Real(*v as f32)).collect()),
    );
    page.set("Contents", Object::Reference(content_id));
    page.set("Resources", Object::Dictionary(Dictionary::new()));
    doc.add_object(page)
}

/// Replace the root `Pages` node with a flat one listing `kids` in order.
pub(crate) fn write_flat_tree(doc: &mut Document, pages_id: ObjectId, kids: &[ObjectId]) {
    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set(
        "Kids",
        Object::Array(kids.iter().map(|id| Object::Reference(*id)).collect()),
    );
    pages.set("Count", Object::Integer(kids.len() as i64));
    doc.objects.insert(pages_id, Object::Dictionary(pages));
}
