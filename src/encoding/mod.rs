//! Base64 text codecs for GitHub content payloads.
//!
//! The contents API returns file bodies base64-encoded and wrapped at 60
//! columns, so decoding has to discard the embedded newlines first.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Encode UTF-8 text for the contents API.
pub fn to_base64(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

/// Decode a contents API payload back to text.
///
/// ASCII whitespace (the line wrapping GitHub inserts) is stripped before
/// decoding; the decoded bytes must be valid UTF-8.
pub fn from_base64(encoded: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = BASE64
        .decode(compact.as_bytes())
        .context("Invalid base64 content")?;

    String::from_utf8(bytes).context("Decoded content is not valid UTF-8")
}
