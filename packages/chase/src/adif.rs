//! Minimal ADIF (Amateur Data Interchange Format) reader.
//!
//! Handles the tagged text form: an optional header terminated by `<EOH>`,
//! then records made of `<NAME:LEN[:TYPE]>value` fields, each record
//! terminated by `<EOR>`. Field names are case-insensitive and stored
//! upper-cased.

use std::collections::BTreeMap;

/// Errors that can occur while parsing ADIF text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdifError {
    /// A `<` was never closed by `>`.
    #[error("Unterminated tag at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the opening `<`.
        offset: usize,
    },

    /// The length part of a field tag is not a number.
    #[error("Invalid length in tag <{tag}>")]
    InvalidLength {
        /// The tag body as written.
        tag: String,
    },
}

/// One QSO record: upper-cased field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdifRecord {
    fields: BTreeMap<String, String>,
}

impl AdifRecord {
    /// Returns a field value by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_uppercase()).map(String::as_str)
    }

    /// Returns a trimmed, non-empty field value.
    #[must_use]
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Sets a field, upper-casing its name.
    pub fn insert(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_uppercase(), value);
    }

    /// Returns `true` if no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A parsed ADIF file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdifLog {
    /// Free text and fields preceding `<EOH>`, verbatim.
    pub header: String,
    /// QSO records in file order.
    pub records: Vec<AdifRecord>,
}

/// Parses ADIF text.
///
/// A trailing record without `<EOR>` is kept.
///
/// # Errors
///
/// Returns [`AdifError`] for unterminated tags or non-numeric lengths.
pub fn parse_adif(text: &str) -> Result<AdifLog, AdifError> {
    let (header, body, body_offset) = split_header(text);

    let mut log = AdifLog {
        header: header.to_string(),
        records: Vec::new(),
    };
    let mut current = AdifRecord::default();
    let mut pos = 0;

    while let Some(open) = body[pos..].find('<') {
        let tag_start = pos + open + 1;
        let Some(close) = body[tag_start..].find('>') else {
            return Err(AdifError::UnterminatedTag {
                offset: body_offset + pos + open,
            });
        };
        let tag = &body[tag_start..tag_start + close];
        pos = tag_start + close + 1;

        let mut parts = tag.split(':');
        let name = parts.next().unwrap_or_default().trim();

        if name.eq_ignore_ascii_case("EOR") {
            if !current.is_empty() {
                log.records.push(std::mem::take(&mut current));
            }
            continue;
        }

        let Some(len) = parts.next() else {
            continue;
        };
        let len: usize = len.trim().parse().map_err(|_| AdifError::InvalidLength {
            tag: tag.to_string(),
        })?;

        let value: String = body[pos..].chars().take(len).collect();
        pos += value.len();
        current.insert(name, value);
    }

    if !current.is_empty() {
        log.records.push(current);
    }

    Ok(log)
}

/// Splits off the header. A file whose first character is `<` has none.
fn split_header(text: &str) -> (&str, &str, usize) {
    if text.trim_start().starts_with('<') {
        return ("", text, 0);
    }
    let upper = text.to_ascii_uppercase();
    match upper.find("<EOH>") {
        Some(idx) => (&text[..idx], &text[idx + 5..], idx + 5),
        None => ("", text, 0),
    }
}
