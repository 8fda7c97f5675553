//! PDF composition: concatenate uploaded PDFs and pad with blank pages.
//!
//! Page order in the output is strictly the concatenation of the sources in
//! argument order, each source's own page order preserved. Field records
//! address pages by this 1-based order.
//!
//! # Example
//!
//! ```no_run
//! use pdf_field_mapper::composer::{merge_files, BlankPagePosition, ComposedDocument, PdfSource};
//!
//! # fn main() -> pdf_field_mapper::Result<()> {
//! let merged = merge_files(&[
//!     PdfSource::detect("contract.pdf"),
//!     PdfSource::detect("appendix.pdf"),
//! ])?;
//! println!("{} pages", merged.page_count);
//!
//! let mut doc = ComposedDocument::from_source(&PdfSource::Bytes(merged.bytes))?;
//! doc.add_blank_pages(2, BlankPagePosition::Before)?;
//! let padded = doc.finish()?;
//! assert_eq!(padded.page_count, merged.page_count + 2);
//! # Ok(())
//! # }
//! ```

mod page_tree;
pub mod source;

pub use source::{decode_data_uri, encode_data_uri, PdfSource};

use crate::error::{Error, Result};
use crate::geometry::PageDimensions;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;

/// MIME type of composed output.
pub const PDF_MIME: &str = "application/pdf";

/// Where [`ComposedDocument::add_blank_pages`] puts the new pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankPagePosition {
    /// In front of the existing pages
    Before,
    /// After the existing pages (default)
    #[default]
    After,
}

impl std::str::FromStr for BlankPagePosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(Error::Unsupported(format!("blank page position '{}'", other))),
        }
    }
}

/// Serialized output of a composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPdf {
    /// PDF file bytes
    pub bytes: Vec<u8>,
    /// Total pages
    pub page_count: usize,
}

impl MergedPdf {
    /// Standard base64 of the bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:application/pdf;base64,...` for handing to a viewer.
    pub fn to_data_uri(&self) -> String {
        encode_data_uri(PDF_MIME, &self.bytes)
    }
}

/// A document being assembled from other documents' pages.
///
/// The page tree is kept flat: one root `Pages` node whose `Kids` lists every
/// page in order.
pub struct ComposedDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl Default for ComposedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComposedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedDocument")
            .field("pages", &self.page_ids.len())
            .field("objects", &self.doc.objects.len())
            .finish()
    }
}

impl ComposedDocument {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        page_tree::write_flat_tree(&mut doc, pages_id, &[]);
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Load a single source as a composed document.
    pub fn from_source(source: &PdfSource) -> Result<Self> {
        let mut composed = Self::new();
        composed.append(source)?;
        Ok(composed)
    }

    /// Load and append every page of `source`. Returns the pages added.
    pub fn append(&mut self, source: &PdfSource) -> Result<usize> {
        let bytes = source.read()?;
        let doc = load_document(&bytes)?;
        self.append_document(doc)
    }

    /// Append every page of an already-loaded document, in its page order.
    pub fn append_document(&mut self, mut source: Document) -> Result<usize> {
        source.renumber_objects_with(self.doc.max_id + 1);

        let pages = page_tree::page_ids(&source);
        if pages.is_empty() {
            return Err(Error::InvalidPageTree("document has no pages".to_string()));
        }
        for &page_id in &pages {
            page_tree::materialize_inherited(&mut source, page_id)?;
        }

        let page_set: BTreeSet<ObjectId> = pages.iter().copied().collect();
        let mut skipped = 0usize;
        for (id, object) in source.objects {
            if !page_set.contains(&id) && page_tree::is_tree_node(&object) {
                skipped += 1;
                continue;
            }
            self.doc.objects.insert(id, object);
        }
        self.doc.max_id = self.doc.max_id.max(source.max_id);

        for &page_id in &pages {
            let page = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
            page.set("Parent", Object::Reference(self.pages_id));
        }
        self.page_ids.extend_from_slice(&pages);
        self.sync_tree();

        log::debug!(
            "Appended {} pages ({} tree nodes dropped), {} pages total",
            pages.len(),
            skipped,
            self.page_ids.len()
        );
        Ok(pages.len())
    }

    /// Add `count` empty pages.
    ///
    /// With [`BlankPagePosition::Before`] the blanks go to the front in the
    /// order they were created. Blank pages take the first page's MediaBox,
    /// or A4 when the document is empty.
    pub fn add_blank_pages(&mut self, count: usize, position: BlankPagePosition) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let media_box = match self.page_ids.first() {
            Some(&first) => page_tree::media_box(&self.doc, first)?,
            None => page_tree::A4_MEDIA_BOX,
        };

        let blanks: Vec<ObjectId> = (0..count)
            .map(|_| page_tree::create_blank_page(&mut self.doc, media_box, self.pages_id))
            .collect();
        match position {
            BlankPagePosition::After => self.page_ids.extend(blanks),
            BlankPagePosition::Before => {
                self.page_ids.splice(0..0, blanks);
            },
        }
        self.sync_tree();

        log::info!("Added {} blank pages {:?}, {} pages total", count, position, self.page_ids.len());
        Ok(())
    }

    /// Pages so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Rendered size of a 1-based page.
    pub fn page_dimensions(&self, page_number: usize) -> Result<PageDimensions> {
        let page_id = page_number
            .checked_sub(1)
            .and_then(|i| self.page_ids.get(i))
            .ok_or(Error::PageOutOfRange {
                page: page_number,
                count: self.page_ids.len(),
            })?;
        page_tree::page_dimensions(&self.doc, *page_id)
    }

    /// Serialize the document.
    pub fn finish(mut self) -> Result<MergedPdf> {
        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(MergedPdf {
            bytes,
            page_count: self.page_ids.len(),
        })
    }

    fn sync_tree(&mut self) {
        page_tree::write_flat_tree(&mut self.doc, self.pages_id, &self.page_ids);
    }
}

/// Concatenate `first` and then each of `additional`, in order.
///
/// Any load failure aborts the whole merge; no partial output is returned.
pub fn merge(first: &PdfSource, additional: &[PdfSource]) -> Result<MergedPdf> {
    let mut composed = ComposedDocument::new();
    for source in std::iter::once(first).chain(additional) {
        composed.append(source).map_err(|e| {
            log::warn!("Merge aborted loading {:?}: {}", source, e);
            e
        })?;
    }
    let merged = composed.finish()?;
    log::info!(
        "Merged {} sources into {} pages ({} bytes)",
        additional.len() + 1,
        merged.page_count,
        merged.bytes.len()
    );
    Ok(merged)
}

/// Merge a list of sources.
///
/// A single source is returned byte-for-byte, without re-encoding.
pub fn merge_files(sources: &[PdfSource]) -> Result<MergedPdf> {
    match sources {
        [] => Err(Error::EmptyInput),
        [only] => {
            let bytes = only.read()?;
            let page_count = load_document(&bytes)?.get_pages().len();
            log::debug!("Single source, no merge needed ({} pages)", page_count);
            Ok(MergedPdf { bytes, page_count })
        },
        [first, rest @ ..] => merge(first, rest),
    }
}

/// Load `source` and add `count` blank pages.
pub fn add_blank_pages(source: &PdfSource, count: usize, position: BlankPagePosition) -> Result<MergedPdf> {
    let mut composed = ComposedDocument::from_source(source)?;
    composed.add_blank_pages(count, position)?;
    composed.finish()
}

/// Page count of a PDF without composing it.
pub fn page_count(source: &PdfSource) -> Result<usize> {
    let bytes = source.read()?;
    Ok(load_document(&bytes)?.get_pages().len())
}

fn load_document(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}
