//! Where a PDF comes from.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;

lazy_static! {
    /// `data:[<mime>][;param]*[;base64],<payload>`
    static ref RE_DATA_URI: Regex =
        Regex::new(r"(?s)^data:(?P<mime>[^;,]*)(?P<params>(?:;[^;,]*)*?)(?P<b64>;base64)?,(?P<data>.*)$").unwrap();
}

/// A PDF binary to load.
#[derive(Clone, PartialEq, Eq)]
pub enum PdfSource {
    /// Raw bytes already in memory
    Bytes(Vec<u8>),
    /// File on disk
    Path(PathBuf),
    /// `data:application/pdf;base64,...`
    DataUri(String),
    /// Bare base64 payload
    Base64(String),
    /// Remote URL (requires the `remote` feature)
    Url(String),
}

impl PdfSource {
    /// Classify a string: data URI, `http(s)` URL, or filesystem path.
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("data:") {
            Self::DataUri(trimmed.to_string())
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Read the full binary.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::Path(path) => Ok(std::fs::read(path)?),
            Self::DataUri(uri) => decode_data_uri(uri).map(|(_, bytes)| bytes),
            Self::Base64(payload) => decode_base64(payload),
            Self::Url(url) => fetch(url),
        }
    }
}

impl fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Self::Path(path) => write!(f, "Path({})", path.display()),
            Self::DataUri(uri) => write!(f, "DataUri({} chars)", uri.len()),
            Self::Base64(payload) => write!(f, "Base64({} chars)", payload.len()),
            Self::Url(url) => write!(f, "Url({})", url),
        }
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for PdfSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Split a data URI into its MIME type and decoded payload.
///
/// Only base64 payloads are accepted; PDFs are binary.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let caps = RE_DATA_URI
        .captures(uri.trim())
        .ok_or_else(|| Error::InvalidDataUri("missing `data:` prefix or `,` separator".to_string()))?;
    if caps.name("b64").is_none() {
        return Err(Error::InvalidDataUri("payload is not base64-encoded".to_string()));
    }
    let mime = caps
        .name("mime")
        .map(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .unwrap_or("text/plain")
        .to_string();
    let data = caps.name("data").map(|m| m.as_str()).unwrap_or_default();
    Ok((mime, decode_base64(data)?))
}

/// Encode bytes as a data URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact.as_bytes())?)
}

#[cfg(feature = "remote")]
fn fetch(url: &str) -> Result<Vec<u8>> {
    log::debug!("Fetching PDF from {}", url);
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &str) -> Result<Vec<u8>> {
    Err(Error::Unsupported(format!(
        "fetching {} requires the `remote` feature",
        url
    )))
}
