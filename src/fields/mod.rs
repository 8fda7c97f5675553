//! Canonical field model for the mapping editor.
//!
//! Every overlay element, whatever upstream collection it came from, becomes a
//! [`Field`]. Type-specific data lives in the [`FieldKind`] variant so that the
//! shared invariants (page number, step index, coordinates) are enforced in one
//! place.
//!
//! # Example
//!
//! ```
//! use pdf_field_mapper::fields::{Field, FieldType};
//! use pdf_field_mapper::geometry::{PageDimensions, UiRect};
//!
//! let mut field = Field::new(FieldType::Signature, 2);
//! field.place(&UiRect::new(100.0, 200.0, 150.0, 40.0), &PageDimensions::A4, 1.0);
//! assert!(field.coordinates.is_valid());
//! assert_eq!(field.position.x, 100);
//! ```

mod attrs;
pub mod collection;
pub mod normalizer;
pub mod report;
pub mod style;

pub use collection::FieldCollection;
pub use normalizer::{
    normalize_mapping, normalize_mapping_with_report, FieldNormalizer, MappingPayload,
    MAPPING_COLLECTIONS,
};
pub use report::{IssueKind, MappingIssue, MappingReport};
pub use style::{FontStyle, FontWeight, FieldStyle, TextAlign};

use crate::config::MappingConfig;
use crate::geometry::{to_pdf_rect, to_ui_rect, PageDimensions, PdfRect, Position, UiRect};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Field type discriminator, as the canvas layer spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text
    Text,
    /// Numeric input
    Number,
    /// Date group (day/month/year)
    Date,
    /// Boolean checkbox
    Checkbox,
    /// Radio option
    Radio,
    /// Dropdown
    Select,
    /// Signature box
    Signature,
    /// Company stamp
    Stamp,
    /// Electronic seal
    Eseal,
    /// Document number
    DocNo,
    /// Attachment slot
    MoreFile,
}

impl FieldType {
    /// The wire name (`"doc_no"`, `"more_file"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Signature => "signature",
            Self::Stamp => "stamp",
            Self::Eseal => "eseal",
            Self::DocNo => "doc_no",
            Self::MoreFile => "more_file",
        }
    }

    /// Checkbox and radio fields hold booleans.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific part of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Numeric input
    Number,
    /// Date group
    Date,
    /// Checkbox with its option list
    Checkbox {
        /// Option labels (one per upstream record)
        options: Vec<String>,
    },
    /// Radio option with its option list
    Radio {
        /// Option labels (one per upstream record)
        options: Vec<String>,
    },
    /// Dropdown
    Select,
    /// Signature box bound to an actor
    Signature {
        /// Signing party
        actor_id: Option<String>,
        /// Signature flavour (drawn, typed, certificate, ...)
        signature_type: Option<String>,
    },
    /// Company stamp
    Stamp,
    /// Electronic seal
    Eseal,
    /// Document number
    DocNo,
    /// Attachment slot
    MoreFile,
}

impl FieldKind {
    /// Kind for `field_type` with empty extensions.
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => Self::Text,
            FieldType::Number => Self::Number,
            FieldType::Date => Self::Date,
            FieldType::Checkbox => Self::Checkbox {
                options: Vec::new(),
            },
            FieldType::Radio => Self::Radio {
                options: Vec::new(),
            },
            FieldType::Select => Self::Select,
            FieldType::Signature => Self::Signature {
                actor_id: None,
                signature_type: None,
            },
            FieldType::Stamp => Self::Stamp,
            FieldType::Eseal => Self::Eseal,
            FieldType::DocNo => Self::DocNo,
            FieldType::MoreFile => Self::MoreFile,
        }
    }

    /// The discriminator for this kind.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text => FieldType::Text,
            Self::Number => FieldType::Number,
            Self::Date => FieldType::Date,
            Self::Checkbox { .. } => FieldType::Checkbox,
            Self::Radio { .. } => FieldType::Radio,
            Self::Select => FieldType::Select,
            Self::Signature { .. } => FieldType::Signature,
            Self::Stamp => FieldType::Stamp,
            Self::Eseal => FieldType::Eseal,
            Self::DocNo => FieldType::DocNo,
            Self::MoreFile => FieldType::MoreFile,
        }
    }
}

/// Field content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox / radio state
    Bool(bool),
    /// Everything else
    Text(String),
}

impl FieldValue {
    /// Default value for a field type.
    pub fn default_for(field_type: FieldType) -> Self {
        if field_type.is_boolean() {
            FieldValue::Bool(false)
        } else {
            FieldValue::Text(String::new())
        }
    }

    /// Get as boolean, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Input constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Must be filled before signing
    pub required: bool,
    /// Character limit; 0 for non-text fields
    pub max_length: u32,
    /// Hint text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Lower bound (number/date fields)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    /// Upper bound (number/date fields)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// One interactive overlay element on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Unique within a document
    pub id: String,
    /// Type and type-specific extensions
    pub kind: FieldKind,
    /// Display label
    pub label: String,
    /// Workflow step grouping
    pub step_index: String,
    /// 1-based page number
    pub page_number: u32,
    /// Top-left pixel position at scale 1.0
    pub position: Position,
    /// Normalized rectangle, or [`PdfRect::ZERO`] when not yet placed
    pub coordinates: PdfRect,
    /// Current content
    pub value: FieldValue,
    /// Input constraints
    pub config: FieldConfig,
    /// Text appearance
    pub style: FieldStyle,
}

impl Field {
    /// Create an unplaced field, as the canvas does on drop.
    ///
    /// The id is `<type>-<uuid>` so it cannot collide with normalized ids.
    pub fn new(field_type: FieldType, page_number: u32) -> Self {
        Self::with_config(field_type, page_number, &MappingConfig::default())
    }

    /// [`new`](Self::new) with step index, `maxLength` and style taken from `config`.
    pub fn with_config(field_type: FieldType, page_number: u32, config: &MappingConfig) -> Self {
        let max_length = if field_type == FieldType::Text {
            config.default_text_max_length
        } else {
            0
        };
        Self {
            id: format!("{}-{}", field_type, uuid::Uuid::new_v4()),
            kind: FieldKind::empty(field_type),
            label: field_type.as_str().to_string(),
            step_index: config.default_step_index.clone(),
            page_number: page_number.max(1),
            position: Position::default(),
            coordinates: PdfRect::ZERO,
            value: FieldValue::default_for(field_type),
            config: FieldConfig {
                max_length,
                ..FieldConfig::default()
            },
            style: config.default_style.clone(),
        }
    }

    /// The type discriminator.
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Move or resize the field from a canvas rectangle.
    ///
    /// `position` is stored at scale 1.0 so it survives zoom changes.
    pub fn place(&mut self, ui: &UiRect, page: &PageDimensions, scale: f64) {
        self.coordinates = to_pdf_rect(ui, page, scale);
        self.position = Position::new((ui.left / scale) as i64, (ui.top / scale) as i64);
    }

    /// Where the field sits on the canvas at `scale`, if it has been placed.
    pub fn ui_rect(&self, page: &PageDimensions, scale: f64) -> Option<UiRect> {
        if self.coordinates.is_placed() {
            Some(to_ui_rect(&self.coordinates, page, scale))
        } else {
            None
        }
    }

    /// Option labels for checkbox/radio fields.
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Checkbox { options } | FieldKind::Radio { options } => Some(options),
            _ => None,
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", &self.field_type())?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("stepIndex", &self.step_index)?;
        map.serialize_entry("pageNumber", &self.page_number)?;
        map.serialize_entry("position", &self.position)?;
        map.serialize_entry("coordinates", &self.coordinates)?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("config", &self.config)?;
        map.serialize_entry("style", &self.style)?;
        match &self.kind {
            FieldKind::Checkbox { options } => map.serialize_entry("checkboxOptions", options)?,
            FieldKind::Radio { options } => map.serialize_entry("radioOptions", options)?,
            FieldKind::Signature {
                actor_id,
                signature_type,
            } => {
                map.serialize_entry("actorId", actor_id)?;
                map.serialize_entry("signatureType", signature_type)?;
            },
            _ => {},
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names() {
        assert_eq!(FieldType::DocNo.as_str(), "doc_no");
        assert_eq!(FieldType::MoreFile.to_string(), "more_file");
        assert_eq!(serde_json::to_value(FieldType::Eseal).unwrap(), "eseal");
        let parsed: FieldType = serde_json::from_str("\"more_file\"").unwrap();
        assert_eq!(parsed, FieldType::MoreFile);
    }

    #[test]
    fn test_kind_round_trips_type() {
        for t in [
            FieldType::Text,
            FieldType::Number,
            FieldType::Date,
            FieldType::Checkbox,
            FieldType::Radio,
            FieldType::Select,
            FieldType::Signature,
            FieldType::Stamp,
            FieldType::Eseal,
            FieldType::DocNo,
            FieldType::MoreFile,
        ] {
            assert_eq!(FieldKind::empty(t).field_type(), t);
        }
    }

    #[test]
    fn test_default_values() {
        assert_eq!(FieldValue::default_for(FieldType::Checkbox), FieldValue::Bool(false));
        assert_eq!(FieldValue::default_for(FieldType::Radio).as_bool(), Some(false));
        assert_eq!(FieldValue::default_for(FieldType::Date).as_text(), Some(""));
    }

    #[test]
    fn test_new_field_is_unplaced() {
        let field = Field::new(FieldType::Text, 0);
        assert!(field.id.starts_with("text-"));
        assert_eq!(field.page_number, 1);
        assert_eq!(field.coordinates, PdfRect::ZERO);
        assert_eq!(field.config.max_length, 100);
        assert!(field.ui_rect(&PageDimensions::A4, 1.0).is_none());
    }

    #[test]
    fn test_new_field_ids_are_unique() {
        let a = Field::new(FieldType::Stamp, 1);
        let b = Field::new(FieldType::Stamp, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_interactive_and_normalized_defaults_agree() {
        let style = FieldStyle {
            font_size: 18.0,
            ..FieldStyle::default()
        };
        let config = MappingConfig::new()
            .with_text_max_length(40)
            .with_step_index("2")
            .with_style(style);
        let created = Field::with_config(FieldType::Text, 1, &config);
        let loaded = FieldNormalizer::new(config).normalize_record(FieldType::Text, &serde_json::json!({}), 0);

        assert_eq!(created.config, loaded.config);
        assert_eq!(created.step_index, loaded.step_index);
        assert_eq!(created.style, loaded.style);
        assert_eq!(created.config.max_length, 40);
        assert_eq!(created.style.font_size, 18.0);

        let signature = Field::with_config(FieldType::Signature, 1, &MappingConfig::new().with_text_max_length(40));
        assert_eq!(signature.config.max_length, 0);
    }

    #[test]
    fn test_place_stores_unscaled_position() {
        let mut field = Field::new(FieldType::Date, 1);
        field.place(&UiRect::new(200.0, 100.0, 60.0, 20.0), &PageDimensions::A4, 2.0);
        assert_eq!(field.position, Position::new(100, 50));

        let ui = field.ui_rect(&PageDimensions::A4, 2.0).unwrap();
        assert!((ui.left - 200.0).abs() < 1e-9);
        assert!((ui.top - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialize_checkbox_extension_only() {
        let mut field = Field::new(FieldType::Checkbox, 1);
        field.kind = FieldKind::Checkbox {
            options: vec!["agree".to_string()],
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "checkbox");
        assert_eq!(json["value"], false);
        assert_eq!(json["checkboxOptions"][0], "agree");
        assert!(json.get("radioOptions").is_none());
        assert!(json.get("actorId").is_none());
    }

    #[test]
    fn test_serialize_signature_extension() {
        let mut field = Field::new(FieldType::Signature, 3);
        field.kind = FieldKind::Signature {
            actor_id: Some("42".to_string()),
            signature_type: None,
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["pageNumber"], 3);
        assert_eq!(json["actorId"], "42");
        assert!(json["signatureType"].is_null());
        assert_eq!(json["coordinates"]["urx"], 0.0);
        assert_eq!(json["config"]["maxLength"], 0);
    }
}
