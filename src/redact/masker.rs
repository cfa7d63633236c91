//! JSON classification and value masking.

use std::collections::HashSet;

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// Character used to mask sensitive string values.
pub const MASK_CHAR: char = '*';

/// Terminal outcome of one redaction pass.
#[derive(Debug, PartialEq)]
pub enum RedactionOutcome {
    /// Body parsed as JSON; the serialized (possibly mutated) document.
    Masked(String),
    /// Body is not JSON; the original bytes, untouched.
    Unmodified(Bytes),
}

/// Errors that can occur while modifying a response.
#[derive(Debug, Error)]
pub enum RedactError {
    /// The upstream response body could not be read.
    #[error("failed to read response body: {0}")]
    Read(String),

    /// The masked document could not be serialized back to JSON.
    #[error("failed to serialize masked document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Classify a body and mask string values under the configured keys.
///
/// Parse failure is classification, not an error: non-JSON payloads pass
/// through byte-for-byte. JSON payloads are re-serialized in compact form
/// with their original key order.
pub fn redact_body(
    body: Bytes,
    masked_keys: &HashSet<String>,
) -> Result<RedactionOutcome, RedactError> {
    let mut document: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return Ok(RedactionOutcome::Unmodified(body)),
    };

    mask_value(&mut document, masked_keys);
    let text = serde_json::to_string(&document)?;

    Ok(RedactionOutcome::Masked(text))
}

/// Walk the document, masking string values under matching keys.
///
/// Key matching is exact and case-sensitive, at every nesting depth. A
/// matching key holding a non-string value is left untouched, and traversal
/// continues beneath it.
fn mask_value(value: &mut Value, masked_keys: &HashSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if masked_keys.contains(key.as_str()) && entry.is_string() {
                    if let Some(original) = entry.as_str() {
                        let masked = mask_string(original);
                        *entry = Value::String(masked);
                    }
                } else {
                    mask_value(entry, masked_keys);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                mask_value(item, masked_keys);
            }
        }
        _ => {}
    }
}

/// Replace a string with mask characters of identical character count.
fn mask_string(original: &str) -> String {
    MASK_CHAR.to_string().repeat(original.chars().count())
}
