//! Advisory validation report for mapping payloads.
//!
//! Normalization never rejects a record. The report records every place where
//! an upstream value was missing in an unexpected way or malformed, so the host
//! can decide whether to surface it.

use crate::geometry::PdfRect;
use serde::Serialize;
use std::fmt;

/// What went wrong with an upstream value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// `mapping_*` key the normalizer does not know
    UnknownCollection,
    /// Collection value is not an array
    NotAnArray,
    /// Array entry is not an object; an all-default field was produced
    NotAnObject,
    /// Numeric attribute could not be parsed; a default was used
    MalformedNumber {
        /// Attribute name
        attribute: String,
        /// Raw upstream text
        raw: String,
    },
    /// Page number below 1; the default page was used
    PageNumberBelowOne {
        /// Upstream value
        page_number: i64,
    },
    /// Some but not all of `llx, lly, urx, ury` were present
    PartialCoordinates {
        /// Which of the four were present
        present: Vec<String>,
    },
    /// All four coordinates present but outside the normalized invariant
    InvalidCoordinates {
        /// Parsed rectangle
        coordinates: PdfRect,
    },
}

/// One finding, located by collection and record index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingIssue {
    /// Payload key, e.g. `mapping_text`
    pub collection: String,
    /// Index within the collection, if the issue is about a record
    pub index: Option<usize>,
    /// Id of the produced field, if one was produced
    pub field_id: Option<String>,
    /// Finding
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for MappingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]: ", self.collection, i)?,
            None => write!(f, "{}: ", self.collection)?,
        }
        match &self.kind {
            IssueKind::UnknownCollection => write!(f, "unknown collection"),
            IssueKind::NotAnArray => write!(f, "collection is not an array"),
            IssueKind::NotAnObject => write!(f, "record is not an object"),
            IssueKind::MalformedNumber { attribute, raw } => {
                write!(f, "malformed number {:?} in '{}'", raw, attribute)
            },
            IssueKind::PageNumberBelowOne { page_number } => {
                write!(f, "page number {} below 1", page_number)
            },
            IssueKind::PartialCoordinates { present } => {
                write!(f, "partial coordinates ({})", present.join(", "))
            },
            IssueKind::InvalidCoordinates { coordinates } => write!(
                f,
                "coordinates out of range [{}, {}, {}, {}]",
                coordinates.llx, coordinates.lly, coordinates.urx, coordinates.ury
            ),
        }
    }
}

/// All findings from one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappingReport {
    /// Findings in payload order
    pub issues: Vec<MappingIssue>,
}

impl MappingReport {
    /// No findings.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when there are no findings.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings attached to a given field id.
    pub fn for_field<'a>(&'a self, field_id: &'a str) -> impl Iterator<Item = &'a MappingIssue> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.field_id.as_deref() == Some(field_id))
    }

    pub(crate) fn push(&mut self, issue: MappingIssue) {
        log::warn!("Mapping payload: {}", issue);
        self.issues.push(issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: IssueKind) -> MappingIssue {
        MappingIssue {
            collection: "mapping_text".to_string(),
            index: Some(2),
            field_id: Some("text-2".to_string()),
            kind,
        }
    }

    #[test]
    fn test_display_locates_issue() {
        let msg = issue(IssueKind::MalformedNumber {
            attribute: "left".to_string(),
            raw: "abc".to_string(),
        })
        .to_string();
        assert!(msg.starts_with("mapping_text[2]"));
        assert!(msg.contains("left"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_for_field_filters() {
        let mut report = MappingReport::default();
        report.push(issue(IssueKind::NotAnObject));
        report.push(MappingIssue {
            collection: "mapping_zzz".to_string(),
            index: None,
            field_id: None,
            kind: IssueKind::UnknownCollection,
        });
        assert_eq!(report.len(), 2);
        assert_eq!(report.for_field("text-2").count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(issue(IssueKind::PageNumberBelowOne { page_number: 0 })).unwrap();
        assert_eq!(json["kind"], "page_number_below_one");
        assert_eq!(json["page_number"], 0);
        assert_eq!(json["collection"], "mapping_text");
    }
}
