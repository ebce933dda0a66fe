//! Policy document transcoding: URL-encoded JSON to YAML, plus indentation.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::error::{RoleExtractorError, RoleExtractorResult};

/// Reverse the URL encoding IAM applies to policy documents.
///
/// Follows query-string rules: `+` decodes to a space and `%XX` to the byte
/// `0xXX`. A `%` that is not followed by two hex digits is rejected.
pub fn decode_document(raw: &str) -> RoleExtractorResult<String> {
    check_percent_sequences(raw)?;

    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| RoleExtractorError::Decode(format!("decoded bytes are not UTF-8: {e}")))
}

fn check_percent_sequences(raw: &str) -> RoleExtractorResult<()> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(RoleExtractorError::Decode(format!(
                    "malformed escape sequence {:?} at byte {}",
                    String::from_utf8_lossy(&bytes[i..end]),
                    i
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Convert JSON text to YAML text.
///
/// Object keys keep their source order. Mappings nest by two spaces and
/// sequence items are written as `- ` entries. The trailing newline the YAML
/// emitter appends is removed.
pub fn to_structured_text(json: &str) -> RoleExtractorResult<String> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| RoleExtractorError::Conversion(format!("invalid JSON: {e}")))?;

    let yaml = serde_yaml::to_string(&value)
        .map_err(|e| RoleExtractorError::Conversion(e.to_string()))?;

    Ok(match yaml.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => yaml,
    })
}

/// Decode a URL-encoded policy document and convert it to YAML.
pub fn transcode_document(raw: &str) -> RoleExtractorResult<String> {
    let json = decode_document(raw)?;
    to_structured_text(&json)
}

/// Prefix every line of `text`, blank lines included, with `columns` spaces.
///
/// Lines are split on `\n`, so a `\r\n` separator survives untouched and the
/// line count is preserved exactly.
pub fn indent(text: &str, columns: usize) -> String {
    let spacer = " ".repeat(columns);
    text.split('\n')
        .map(|line| format!("{spacer}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
