// The `_parts` transform wrappers take a rectangle, a page and a scale as scalars
#![allow(clippy::too_many_arguments)]

//! # PDF Field Mapper
//!
//! Core of a contract-signing field editor: place interactive fields on PDF
//! pages, rebuild saved field layouts, and compose the working document.
//!
//! ## Core Features
//!
//! ### Geometry
//! - **Coordinate Transform**: zoom-aware pixel rectangles to normalized,
//!   bottom-left-origin PDF rectangles and back
//! - **Validation**: `0 ≤ llx < urx ≤ 1`, `0 ≤ lly < ury ≤ 1`
//!
//! ### Fields
//! - **Canonical Model**: one tagged [`fields::Field`] type for all eleven field kinds
//! - **Mapping Normalizer**: nine loosely-typed backend collections to canonical fields,
//!   with an advisory validation report
//! - **Session List**: ordered [`fields::FieldCollection`] keyed by id
//!
//! ### Documents
//! - **Composer**: concatenate PDFs from bytes, files, data URIs or URLs; pad with blank pages
//! - **Session Cache**: budgeted [`storage::PdfStore`] with in-memory and on-disk backends
//!
//! ### Dates
//! - **Eight Formats**: Gregorian, Buddhist era, short/full Thai month names, Thai digits
//! - **Editor State**: explicit manual / current-date-locked state machine
//!
//! ## Quick Start
//!
//! ```
//! use pdf_field_mapper::fields::{normalize_mapping_with_report, MappingPayload};
//! use pdf_field_mapper::geometry::{to_ui_rect, PageDimensions};
//!
//! # fn main() -> pdf_field_mapper::Result<()> {
//! let payload = MappingPayload::from_json_str(r#"{
//!     "mapping_signature": [{
//!         "pageNumber": "1", "actor_id": "17",
//!         "llx": "0.1", "lly": "0.1", "urx": "0.4", "ury": "0.2"
//!     }]
//! }"#)?;
//!
//! let (fields, report) = normalize_mapping_with_report(&payload);
//! assert!(report.is_clean());
//!
//! // Project onto the canvas at 150% zoom.
//! let ui = to_ui_rect(&fields[0].coordinates, &PageDimensions::A4, 1.5);
//! assert!(ui.width > 0.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Coordinate spaces and transforms
pub mod geometry;

// Canonical field model and mapping normalization
pub mod fields;

// PDF merging and blank pages
pub mod composer;

// Session cache for composed PDFs
pub mod storage;

// Date field formats and editor state
pub mod dates;

// Re-exports
pub use composer::{merge, merge_files, BlankPagePosition, ComposedDocument, MergedPdf, PdfSource};
pub use config::{DateConfig, MapperConfig, MappingConfig, StoreConfig};
pub use dates::{DateFieldState, DateFormat};
pub use error::{Error, Result};
pub use fields::{
    normalize_mapping, normalize_mapping_with_report, Field, FieldCollection, FieldType, MappingPayload,
    MappingReport,
};
pub use geometry::{PageDimensions, PdfRect, UiRect};
pub use storage::{DirectoryStore, MemoryStore, PdfStore, StoredPdf};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_field_mapper");
    }
}
