//! Mapping payload normalization.
//!
//! The backend stores a field layout as up to nine per-type arrays
//! (`mapping_text`, `mapping_signature`, ...), each holding loosely-typed
//! records. [`FieldNormalizer`] turns every record into a canonical [`Field`].
//!
//! Normalization is total: missing or malformed attributes resolve to
//! documented defaults and a field is always produced. What was defaulted is
//! recorded in a [`MappingReport`] for callers that want to surface it.
//!
//! Per-record resolution:
//!
//! | Field         | Source                                         | Default             |
//! |---------------|------------------------------------------------|---------------------|
//! | `stepIndex`   | `step_index`                                   | `"0"`               |
//! | `pageNumber`  | `pageNumber` / `page_number`                   | `1`                 |
//! | `position`    | `left`/`top`, then `scale_X`/`scale_Y`         | `0`                 |
//! | `coordinates` | `llx`, `lly`, `urx`, `ury` (all four)          | zero rect           |
//! | `label`       | `text`, `<type>_name`, `<collection>_name`     | type name           |
//! | `value`       | `value`                                        | `false` / `""`      |
//! | `maxLength`   | `max_length` / `maxLength` (text only)         | `100`, else `0`     |
//!
//! # Example
//!
//! ```
//! use pdf_field_mapper::fields::{normalize_mapping, MappingPayload};
//!
//! let payload = MappingPayload::from_json_str(r#"{
//!     "mapping_text": [{"text": "Name", "left": "120", "top": 80, "pageNumber": 2}],
//!     "mapping_stamp": [{"section": "A", "stampType": "ต้นสัญญา"}]
//! }"#).unwrap();
//!
//! let fields = normalize_mapping(&payload);
//! assert_eq!(fields[0].id, "text-0");
//! assert_eq!(fields[0].page_number, 2);
//! assert_eq!(fields[1].id, "stamp-A-0-0");
//! ```

use super::attrs::{scalar_to_string, Numeric, Record};
use super::report::{IssueKind, MappingIssue, MappingReport};
use super::style::convert_style;
use super::{Field, FieldConfig, FieldKind, FieldType, FieldValue};
use crate::config::MappingConfig;
use crate::error::Result;
use crate::geometry::{PdfRect, Position};
use phf::phf_ordered_map;
use serde_json::{Map, Value};

/// Payload keys in the order fields are emitted, with the type each produces.
pub static MAPPING_COLLECTIONS: phf::OrderedMap<&'static str, FieldType> = phf_ordered_map! {
    "mapping_text" => FieldType::Text,
    "mapping_signature" => FieldType::Signature,
    "mapping_date_time" => FieldType::Date,
    "mapping_checkbox" => FieldType::Checkbox,
    "mapping_radiobox" => FieldType::Radio,
    "mapping_doc_no" => FieldType::DocNo,
    "mapping_more_file" => FieldType::MoreFile,
    "mapping_eseal" => FieldType::Eseal,
    "mapping_stamp" => FieldType::Stamp,
};

/// `stampType` value marking the originating party's stamp.
pub const PRIMARY_STAMP_TYPE: &str = "ต้นสัญญา";

const COORDINATE_KEYS: [&str; 4] = ["llx", "lly", "urx", "ury"];

/// The backend mapping bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingPayload {
    collections: Map<String, Value>,
}

impl MappingPayload {
    /// Wrap an already-parsed JSON object.
    ///
    /// Anything other than an object yields an empty payload.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(collections) => Self { collections },
            other => {
                log::warn!("Mapping payload is not an object ({}), treating as empty", kind_name(&other));
                Self::default()
            },
        }
    }

    /// Parse a payload from JSON text. The top level must be an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let collections: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self { collections })
    }

    /// Raw collection by payload key.
    pub fn collection(&self, key: &str) -> Option<&Value> {
        self.collections.get(key)
    }

    /// Insert or replace a collection.
    pub fn set_collection(&mut self, key: impl Into<String>, records: Vec<Value>) {
        self.collections.insert(key.into(), Value::Array(records));
    }

    /// Number of records across known collections.
    pub fn record_count(&self) -> usize {
        MAPPING_COLLECTIONS
            .keys()
            .filter_map(|k| self.collections.get(*k))
            .filter_map(Value::as_array)
            .map(Vec::len)
            .sum()
    }
}

/// Converts mapping payload records into canonical fields.
#[derive(Debug, Clone, Default)]
pub struct FieldNormalizer {
    config: MappingConfig,
}

impl FieldNormalizer {
    /// Create a normalizer with the given defaults.
    pub fn new(config: MappingConfig) -> Self {
        Self { config }
    }

    /// Defaults in use.
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Normalize every known collection, discarding the report.
    pub fn normalize(&self, payload: &MappingPayload) -> Vec<Field> {
        self.normalize_with_report(payload).0
    }

    /// Normalize every known collection and report what was defaulted.
    pub fn normalize_with_report(&self, payload: &MappingPayload) -> (Vec<Field>, MappingReport) {
        let mut report = MappingReport::default();
        let mut fields = Vec::with_capacity(payload.record_count());

        for key in payload.collections.keys() {
            if key.starts_with("mapping_") && !MAPPING_COLLECTIONS.contains_key(key.as_str()) {
                report.push(MappingIssue {
                    collection: key.clone(),
                    index: None,
                    field_id: None,
                    kind: IssueKind::UnknownCollection,
                });
            }
        }

        for (key, field_type) in MAPPING_COLLECTIONS.entries() {
            let records = match payload.collections.get(*key) {
                None | Some(Value::Null) => continue,
                Some(Value::Array(records)) => records,
                Some(_) => {
                    report.push(MappingIssue {
                        collection: key.to_string(),
                        index: None,
                        field_id: None,
                        kind: IssueKind::NotAnArray,
                    });
                    continue;
                },
            };

            for (index, record) in records.iter().enumerate() {
                let mut issues = Vec::new();
                let field = self.build_field(*field_type, record, index, &mut issues);
                for kind in issues {
                    report.push(MappingIssue {
                        collection: key.to_string(),
                        index: Some(index),
                        field_id: Some(field.id.clone()),
                        kind,
                    });
                }
                fields.push(field);
            }
        }

        log::debug!(
            "Normalized {} fields from mapping payload ({} issues)",
            fields.len(),
            report.len()
        );
        (fields, report)
    }

    /// Normalize a single record at `index` within its collection.
    pub fn normalize_record(&self, field_type: FieldType, record: &Value, index: usize) -> Field {
        let mut issues = Vec::new();
        self.build_field(field_type, record, index, &mut issues)
    }

    fn build_field(
        &self,
        field_type: FieldType,
        value: &Value,
        index: usize,
        issues: &mut Vec<IssueKind>,
    ) -> Field {
        let empty = Map::new();
        let map = match value {
            Value::Object(map) => map,
            _ => {
                issues.push(IssueKind::NotAnObject);
                &empty
            },
        };
        let record = Record::new(map);

        let step_index = record
            .text("step_index")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.config.default_step_index.clone());

        let position = Position::new(
            axis(&record, "left", "scale_X", issues),
            axis(&record, "top", "scale_Y", issues),
        );

        Field {
            id: field_id(field_type, &record, index),
            kind: field_kind(field_type, &record),
            label: field_label(field_type, &record),
            step_index,
            page_number: self.page_number(&record, issues),
            position,
            coordinates: coordinates(&record, issues),
            value: field_value(field_type, &record),
            config: self.field_config(field_type, &record, issues),
            style: convert_style(&record, &self.config.default_style),
        }
    }

    fn page_number(&self, record: &Record<'_>, issues: &mut Vec<IssueKind>) -> u32 {
        let key = if record.has("pageNumber") {
            "pageNumber"
        } else {
            "page_number"
        };
        match record.int(key) {
            Numeric::Absent => self.config.default_page_number,
            Numeric::Parsed(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
            Numeric::Parsed(page) => {
                issues.push(IssueKind::PageNumberBelowOne { page_number: page });
                self.config.default_page_number
            },
            Numeric::Malformed(raw) => {
                issues.push(IssueKind::MalformedNumber {
                    attribute: key.to_string(),
                    raw,
                });
                self.config.default_page_number
            },
        }
    }

    fn field_config(
        &self,
        field_type: FieldType,
        record: &Record<'_>,
        issues: &mut Vec<IssueKind>,
    ) -> FieldConfig {
        let max_length = if field_type == FieldType::Text {
            let key = if record.has("max_length") {
                "max_length"
            } else {
                "maxLength"
            };
            match record.int(key) {
                Numeric::Parsed(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
                Numeric::Malformed(raw) => {
                    issues.push(IssueKind::MalformedNumber {
                        attribute: key.to_string(),
                        raw,
                    });
                    self.config.default_text_max_length
                },
                _ => self.config.default_text_max_length,
            }
        } else {
            0
        };

        FieldConfig {
            required: record.flag("required"),
            max_length,
            placeholder: record.text("placeholder"),
            min: record.text("min"),
            max: record.text("max"),
        }
    }
}

/// Normalize with default configuration.
pub fn normalize_mapping(payload: &MappingPayload) -> Vec<Field> {
    FieldNormalizer::default().normalize(payload)
}

/// Normalize with default configuration, returning the validation report too.
pub fn normalize_mapping_with_report(payload: &MappingPayload) -> (Vec<Field>, MappingReport) {
    FieldNormalizer::default().normalize_with_report(payload)
}

fn axis(record: &Record<'_>, primary: &str, fallback: &str, issues: &mut Vec<IssueKind>) -> i64 {
    let key = if record.has(primary) {
        primary
    } else if record.has(fallback) {
        fallback
    } else {
        return 0;
    };
    match record.int(key) {
        Numeric::Parsed(v) => v,
        Numeric::Absent => 0,
        Numeric::Malformed(raw) => {
            issues.push(IssueKind::MalformedNumber {
                attribute: key.to_string(),
                raw,
            });
            0
        },
    }
}

fn coordinates(record: &Record<'_>, issues: &mut Vec<IssueKind>) -> PdfRect {
    let present: Vec<&str> = COORDINATE_KEYS
        .iter()
        .copied()
        .filter(|k| record.has(k))
        .collect();

    if present.is_empty() {
        return PdfRect::ZERO;
    }
    if present.len() < COORDINATE_KEYS.len() {
        issues.push(IssueKind::PartialCoordinates {
            present: present.iter().map(|k| k.to_string()).collect(),
        });
        return PdfRect::ZERO;
    }

    let mut values = [0.0f64; 4];
    for (slot, key) in values.iter_mut().zip(COORDINATE_KEYS) {
        *slot = match record.float(key) {
            Numeric::Parsed(v) => v,
            Numeric::Absent => 0.0,
            Numeric::Malformed(raw) => {
                issues.push(IssueKind::MalformedNumber {
                    attribute: key.to_string(),
                    raw,
                });
                0.0
            },
        };
    }

    let rect = PdfRect::new(values[0], values[1], values[2], values[3]);
    if rect.is_placed() && !rect.is_valid() {
        issues.push(IssueKind::InvalidCoordinates { coordinates: rect });
    }
    rect
}

fn field_id(field_type: FieldType, record: &Record<'_>, index: usize) -> String {
    if field_type == FieldType::Stamp {
        let section = record.text("section").unwrap_or_default();
        let discriminator = match record.text("stampType") {
            Some(stamp_type) if stamp_type.trim() == PRIMARY_STAMP_TYPE => 0,
            _ => 1,
        };
        format!("{}-{}-{}-{}", field_type, section, discriminator, index)
    } else {
        format!("{}-{}", field_type, index)
    }
}

/// Stem of the collection a type is loaded from (`date_time` for dates).
fn collection_stem(field_type: FieldType) -> Option<&'static str> {
    MAPPING_COLLECTIONS
        .entries()
        .find(|(_, t)| **t == field_type)
        .map(|(key, _)| *key)
        .map(|key| key.trim_start_matches("mapping_"))
}

fn field_label(field_type: FieldType, record: &Record<'_>) -> String {
    let type_key = format!("{}_name", field_type);
    let stem_key = collection_stem(field_type).map(|stem| format!("{}_name", stem));
    let mut keys = vec!["text", type_key.as_str()];
    if let Some(stem_key) = stem_key.as_deref() {
        if stem_key != type_key {
            keys.push(stem_key);
        }
    }
    record
        .text_of(&keys)
        .unwrap_or_else(|| field_type.as_str().to_string())
}

fn field_value(field_type: FieldType, record: &Record<'_>) -> FieldValue {
    match record.raw("value") {
        None => FieldValue::default_for(field_type),
        Some(value) if field_type.is_boolean() => FieldValue::Bool(truthy(value)),
        Some(value) => FieldValue::Text(scalar_to_string(value).unwrap_or_else(|| value.to_string())),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

fn field_kind(field_type: FieldType, record: &Record<'_>) -> FieldKind {
    let option_name = || {
        record
            .text_of(&["option_name", "optionName"])
            .or_else(|| record.text("text"))
            .unwrap_or_default()
    };
    match field_type {
        FieldType::Checkbox => FieldKind::Checkbox {
            options: vec![option_name()],
        },
        FieldType::Radio => FieldKind::Radio {
            options: vec![option_name()],
        },
        FieldType::Signature => FieldKind::Signature {
            actor_id: record.text_of(&["actor_id", "actorId"]),
            signature_type: record.text_of(&["signature_type", "signatureType"]),
        },
        other => FieldKind::empty(other),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
