//! Metadata header codec
//!
//! Text artifacts carry their metadata in a header block:
//!
//! ```text
//! ---
//! artifact_type: story
//! status: draft
//! ---
//!
//! <body>
//! ```
//!
//! Values that would not survive a plain `key: value` line (multi-line, padded,
//! empty, or starting with a quote) are written as JSON string literals.

use crate::error::HeaderError;
use indexmap::IndexMap;

/// Header delimiter line
pub const DELIMITER: &str = "---";

/// Ordered artifact metadata
pub type Metadata = IndexMap<String, String>;

/// Check that a key can be written as a header line and read back unchanged
pub fn validate_key(key: &str) -> Result<(), HeaderError> {
    let valid = !key.is_empty()
        && key.trim() == key
        && !key.contains(':')
        && !key.contains('\n')
        && !key.contains('\r');
    if valid {
        Ok(())
    } else {
        Err(HeaderError::InvalidKey(key.to_string()))
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with('"')
        || value.contains('\n')
        || value.contains('\r')
        || value.trim() != value
}

/// Render header block followed by the body
///
/// # Errors
/// Returns [`HeaderError::InvalidKey`] for keys that cannot round-trip
pub fn encode(metadata: &Metadata, body: &str) -> Result<String, HeaderError> {
    let mut out = String::with_capacity(body.len() + 32 * (metadata.len() + 1));
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in metadata {
        validate_key(key)?;
        out.push_str(key);
        out.push_str(": ");
        if needs_quoting(value) {
            out.push_str(&serde_json::Value::String(value.clone()).to_string());
        } else {
            out.push_str(value);
        }
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(body);
    Ok(out)
}

/// Length of the opening delimiter line, `\n` or `\r\n` terminated
fn opening_len(raw: &str) -> Option<usize> {
    let rest = raw.strip_prefix(DELIMITER)?;
    if rest.is_empty() {
        Some(DELIMITER.len())
    } else if rest.starts_with('\n') {
        Some(DELIMITER.len() + 1)
    } else if rest.starts_with("\r\n") {
        Some(DELIMITER.len() + 2)
    } else {
        None
    }
}

/// Whether raw text opens with a delimiter line
#[must_use]
pub fn has_header(raw: &str) -> bool {
    opening_len(raw).is_some()
}

/// Split raw text into metadata and body
///
/// Returns `Ok(None)` when the text has no header. Header lines may end in
/// `\r\n`.
///
/// # Errors
/// Returns an error when the header opens but cannot be parsed
pub fn decode(raw: &str) -> Result<Option<(Metadata, &str)>, HeaderError> {
    let Some(mut offset) = opening_len(raw) else {
        return Ok(None);
    };
    let mut metadata = Metadata::new();

    for (index, line) in raw[offset..].split_inclusive('\n').enumerate() {
        let line_no = index + 2;
        offset += line.len();
        let text = line.strip_suffix('\n').unwrap_or(line);
        let text = text.strip_suffix('\r').unwrap_or(text);

        if text == DELIMITER {
            let rest = &raw[offset..];
            let body = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            return Ok(Some((metadata, body)));
        }
        if text.trim().is_empty() {
            continue;
        }

        let (key, value) = text
            .split_once(':')
            .ok_or(HeaderError::MissingSeparator { line: line_no })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(HeaderError::EmptyKey { line: line_no });
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        let value = if value.starts_with('"') {
            serde_json::from_str::<String>(value)
                .map_err(|_| HeaderError::InvalidQuotedValue { line: line_no })?
        } else {
            value.to_string()
        };

        if metadata.insert(key.to_string(), value).is_some() {
            return Err(HeaderError::DuplicateKey {
                line: line_no,
                key: key.to_string(),
            });
        }
    }

    Err(HeaderError::Unterminated)
}
