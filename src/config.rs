//! Configuration for field normalization, date fields, and the PDF cache.

use crate::error::Result;
use crate::fields::FieldStyle;
use serde::Deserialize;

/// Defaults applied while normalizing mapping payloads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// `maxLength` for text fields whose record carries none.
    pub default_text_max_length: u32,

    /// Workflow step used when a record has no `step_index`.
    pub default_step_index: String,

    /// Page used when a record has no `pageNumber`.
    pub default_page_number: u32,

    /// Style attributes substituted for missing upstream ones.
    pub default_style: FieldStyle,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            default_text_max_length: 100,
            default_step_index: "0".to_string(),
            default_page_number: 1,
            default_style: FieldStyle::default(),
        }
    }

    /// Set the default text `maxLength`.
    pub fn with_text_max_length(mut self, max_length: u32) -> Self {
        self.default_text_max_length = max_length;
        self
    }

    /// Set the default step index.
    pub fn with_step_index(mut self, step_index: impl Into<String>) -> Self {
        self.default_step_index = step_index.into();
        self
    }

    /// Set the default style.
    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.default_style = style;
        self
    }
}

/// Date field option generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Years offered on each side of the current year.
    pub year_span: i32,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self { year_span: 25 }
    }
}

impl DateConfig {
    /// Set the half-width of the year window.
    pub fn with_year_span(mut self, span: i32) -> Self {
        self.year_span = span.max(0);
        self
    }
}

/// Session cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Total bytes all cached entries may occupy.
    pub budget_bytes: usize,
}

/// Default cache budget (10 MiB).
pub const DEFAULT_STORE_BUDGET: usize = 10 * 1024 * 1024;

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            budget_bytes: DEFAULT_STORE_BUDGET,
        }
    }
}

impl StoreConfig {
    /// Set the byte budget.
    pub fn with_budget(mut self, budget_bytes: usize) -> Self {
        self.budget_bytes = budget_bytes;
        self
    }
}

/// All configuration in one place, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Normalizer defaults
    pub mapping: MappingConfig,
    /// Date field options
    pub date: DateConfig,
    /// Cache sizing
    pub store: StoreConfig,
}

impl MapperConfig {
    /// Parse configuration from JSON; absent keys keep their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_field_mapper::config::MapperConfig;
    ///
    /// let config = MapperConfig::from_json_str(r#"{"store": {"budget_bytes": 1024}}"#).unwrap();
    /// assert_eq!(config.store.budget_bytes, 1024);
    /// assert_eq!(config.mapping.default_text_max_length, 100);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
