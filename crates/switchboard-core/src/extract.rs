//! Pull a JSON object out of free-form model output.
//!
//! Text models wrap JSON in prose or code fences. `find_json_object` scans
//! for the first balanced `{ ... }` span, honouring string literals and
//! escapes so braces inside strings do not end the object early.

use serde::de::DeserializeOwned;

use switchboard_types::error::ExtractionError;

/// The first balanced JSON object in `text`, if any.
pub fn find_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(bytes, start) {
            return Some(&text[start..=end]);
        }
        search_from = start + 1;
    }
    None
}

/// Index of the `}` closing the object opened at `start`.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the first JSON object in `text` and deserialize it into `T`.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, ExtractionError> {
    let object = find_json_object(text).ok_or(ExtractionError::NoJsonObject)?;
    serde_json::from_str(object).map_err(|e| ExtractionError::InvalidShape(e.to_string()))
}
