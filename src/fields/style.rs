//! Text appearance for fields, and conversion from upstream style attributes.
//!
//! Upstream records carry style either flat on the record or in a nested
//! `style` object, under snake_case or camelCase keys. The nested object wins
//! over flat keys; anything missing falls back to the configured defaults.

use super::attrs::{float_prefix, normalize_color, Record};
use serde::{Deserialize, Serialize};

/// Font weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight (default)
    #[default]
    Normal,
    /// Bold
    Bold,
}

impl FontWeight {
    /// Parse `"bold"`, `"normal"`, or a CSS numeric weight (600 and up is bold).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "bold" | "bolder" => Some(Self::Bold),
            "normal" | "lighter" | "regular" => Some(Self::Normal),
            _ => raw
                .parse::<u32>()
                .ok()
                .map(|w| if w >= 600 { Self::Bold } else { Self::Normal }),
        }
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright (default)
    #[default]
    Normal,
    /// Italic / oblique
    Italic,
}

impl FontStyle {
    /// Parse `"italic"`, `"oblique"`, or `"normal"`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "italic" | "oblique" => Some(Self::Italic),
            "normal" => Some(Self::Normal),
            _ => None,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned text (default)
    #[default]
    Left,
    /// Center-aligned text
    Center,
    /// Right-aligned text
    Right,
}

impl TextAlign {
    /// Parse a CSS-ish alignment keyword.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" | "start" | "justify" => Some(Self::Left),
            "center" | "centre" | "middle" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Canonical text appearance of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldStyle {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    /// Weight
    pub font_weight: FontWeight,
    /// Style
    pub font_style: FontStyle,
    /// Alignment
    pub text_align: TextAlign,
    /// Text color (CSS notation)
    pub color: String,
    /// Background color (CSS notation)
    pub background_color: String,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            font_family: "Sarabun".to_string(),
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            color: "#000000".to_string(),
            background_color: "transparent".to_string(),
        }
    }
}

const FAMILY_KEYS: &[&str] = &["font_family", "fontFamily", "font"];
const SIZE_KEYS: &[&str] = &["font_size", "fontSize", "size"];
const WEIGHT_KEYS: &[&str] = &["font_weight", "fontWeight"];
const STYLE_KEYS: &[&str] = &["font_style", "fontStyle"];
const ALIGN_KEYS: &[&str] = &["text_align", "textAlign", "align", "alignment"];
const COLOR_KEYS: &[&str] = &["font_color", "fontColor", "color"];
const BACKGROUND_KEYS: &[&str] = &["background_color", "backgroundColor", "bg_color", "background"];

/// Map upstream style attributes onto a [`FieldStyle`].
pub(crate) fn convert_style(record: &Record<'_>, defaults: &FieldStyle) -> FieldStyle {
    let nested = record.object("style");
    let lookup = |keys: &[&str]| -> Option<String> {
        nested
            .and_then(|n| n.text_of(keys))
            .or_else(|| record.text_of(keys))
    };
    let flag = |key: &str| nested.map(|n| n.flag(key)).unwrap_or(false) || record.flag(key);

    let font_size = match lookup(SIZE_KEYS) {
        Some(raw) => match float_prefix(&raw) {
            Some(size) if size > 0.0 => size,
            _ => {
                log::debug!("Ignoring font size {:?}, using {}", raw, defaults.font_size);
                defaults.font_size
            },
        },
        None => defaults.font_size,
    };

    let font_weight = if flag("bold") {
        FontWeight::Bold
    } else {
        lookup(WEIGHT_KEYS)
            .and_then(|w| FontWeight::parse(&w))
            .unwrap_or(defaults.font_weight)
    };

    let font_style = if flag("italic") {
        FontStyle::Italic
    } else {
        lookup(STYLE_KEYS)
            .and_then(|s| FontStyle::parse(&s))
            .unwrap_or(defaults.font_style)
    };

    FieldStyle {
        font_family: lookup(FAMILY_KEYS)
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| defaults.font_family.clone()),
        font_size,
        font_weight,
        font_style,
        text_align: lookup(ALIGN_KEYS)
            .and_then(|a| TextAlign::parse(&a))
            .unwrap_or(defaults.text_align),
        color: lookup(COLOR_KEYS)
            .map(|c| normalize_color(&c))
            .unwrap_or_else(|| defaults.color.clone()),
        background_color: lookup(BACKGROUND_KEYS)
            .map(|c| normalize_color(&c))
            .unwrap_or_else(|| defaults.background_color.clone()),
    }
}
