//! Tolerant extraction of flat string fields from engine payloads.
//!
//! Engine payloads are JSON objects with string values only. This is a
//! best-effort scan, not a parser: it finds `"name":`, skips spaces, expects
//! an opening quote and reads up to the next quote. Escape sequences are not
//! interpreted. Missing or malformed fields come back empty; nothing here
//! fails.

use crate::line::truncate_chars;

/// Value of `name` in `blob`, truncated to `cap` characters.
///
/// `None` when the key is absent or its value is not a quoted string.
pub fn extract_field(blob: &str, name: &str, cap: usize) -> Option<String> {
    let pattern = format!("\"{name}\":");
    let start = blob.find(&pattern)? + pattern.len();
    let value = blob[start..].trim_start_matches(' ').strip_prefix('"')?;
    let end = value.find('"')?;
    Some(truncate_chars(&value[..end], cap).to_owned())
}

/// Extract several fields at once. Missing fields are empty strings.
///
/// Each field is given as `(name, cap)`.
pub fn extract_fields<const N: usize>(blob: &str, fields: [(&str, usize); N]) -> [String; N] {
    fields.map(|(name, cap)| extract_field(blob, name, cap).unwrap_or_default())
}
