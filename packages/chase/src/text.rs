//! Log file decoding and ASCII transliteration.

use std::path::Path;

use encoding_rs::Encoding;

use crate::ChaseError;

/// Default legacy encoding for logs that are not valid UTF-8.
pub const DEFAULT_LOG_ENCODING: &str = "windows-1250";

/// Resolves a WHATWG encoding label such as `"windows-1250"` or `"latin2"`.
///
/// # Errors
///
/// Returns [`ChaseError::UnknownEncoding`] for unrecognized labels.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, ChaseError> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| ChaseError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decodes log bytes as UTF-8, or as `fallback` when they are not valid
/// UTF-8, then transliterates everything to ASCII.
#[must_use]
pub fn decode_log(bytes: &[u8], fallback: &'static Encoding) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => std::borrow::Cow::Borrowed(text),
        Err(_) => {
            log::debug!("Log is not valid UTF-8, decoding as {}", fallback.name());
            let (text, _, had_errors) = fallback.decode(bytes);
            if had_errors {
                log::warn!("Some log bytes could not be decoded as {}", fallback.name());
            }
            text
        }
    };
    deunicode::deunicode(&text)
}

/// Reads and decodes a log file, optionally saving the ASCII copy.
///
/// # Errors
///
/// Returns [`ChaseError::Io`] if the log cannot be read or the working copy
/// cannot be written.
pub fn read_log(
    path: &Path,
    fallback: &'static Encoding,
    working_copy: Option<&Path>,
) -> Result<String, ChaseError> {
    let bytes = std::fs::read(path)?;
    let text = decode_log(&bytes, fallback);

    if let Some(copy) = working_copy {
        std::fs::write(copy, &text)?;
        log::info!("Saved transliterated log to {}", copy.display());
    }

    Ok(text)
}
