#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summit reference table.
//!
//! Loads the published `summitslist.csv` into a [`SummitTable`] indexed by
//! the upper-cased summit reference. The file starts with a title line
//! (`SOTA Summits List (Date=...)`) which is skipped; the second line is
//! the column header.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead as _, BufReader, Read};
use std::path::Path;

use sota_map_summit_models::{SUMMIT_CSV_COLUMNS, SummitEntry};

/// Errors that can occur while loading the summit reference table.
#[derive(Debug, thiserror::Error)]
pub enum SummitError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header row could not be read.
    #[error("CSV header error: {0}")]
    Header(#[source] csv::Error),

    /// A data row did not match the expected 17-column schema.
    #[error("Malformed summit row at line {line}: {source}")]
    Row {
        /// 1-based line number in the original file.
        line: u64,
        /// Underlying CSV or type-coercion error.
        #[source]
        source: csv::Error,
    },

    /// The header row does not have the expected number of columns.
    #[error("Summit list header has {found} columns, expected {}", SUMMIT_CSV_COLUMNS)]
    Columns {
        /// Columns found in the header row.
        found: usize,
    },

    /// The file has no title line at all.
    #[error("Summit list is empty")]
    Empty,
}

/// In-memory summit lookup keyed by upper-cased reference.
///
/// Loaded once per run and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SummitTable {
    entries: BTreeMap<String, SummitEntry>,
}

impl SummitTable {
    /// Builds a table from already-parsed entries. A later entry with the
    /// same reference replaces an earlier one.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = SummitEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Parses the summit list from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`SummitError`] if the title or header line is missing, the
    /// header is not 17 columns wide, or any row fails type coercion. No partial table is returned.
    pub fn from_reader(reader: impl Read) -> Result<Self, SummitError> {
        let mut buffered = BufReader::new(reader);

        let mut title = String::new();
        if buffered.read_line(&mut title)? == 0 {
            return Err(SummitError::Empty);
        }
        log::debug!("Summit list title: {}", title.trim());

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(buffered);

        let found = csv_reader.headers().map_err(SummitError::Header)?.len();
        if found != SUMMIT_CSV_COLUMNS {
            return Err(SummitError::Columns { found });
        }

        let mut table = Self::default();
        for result in csv_reader.deserialize::<SummitEntry>() {
            let entry = result.map_err(|source| SummitError::Row {
                // csv positions start after the skipped title line
                line: source.position().map_or(0, |p| p.line() + 1),
                source,
            })?;
            table.insert(entry);
        }

        log::info!("Loaded {} summits", table.len());
        Ok(table)
    }

    /// Inserts an entry under its normalized reference.
    pub fn insert(&mut self, entry: SummitEntry) {
        let key = normalize_code(&entry.summit_code);
        if let Some(previous) = self.entries.insert(key, entry) {
            log::warn!(
                "Duplicate summit reference {} in summit list, keeping the later row",
                previous.summit_code
            );
        }
    }

    /// Looks up a summit, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&SummitEntry> {
        self.entries.get(&normalize_code(code))
    }

    /// Returns `true` if the reference is present.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Number of summits in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no summits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalizes a summit reference for use as a lookup key.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Loads the summit list from a CSV file on disk.
///
/// # Errors
///
/// Returns [`SummitError`] if the file cannot be opened or is malformed.
pub fn load_summits_csv(path: &Path) -> Result<SummitTable, SummitError> {
    log::info!("Loading summit list from {}", path.display());
    let file = File::open(path)?;
    SummitTable::from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "SummitCode,AssociationName,RegionName,SummitName,AltM,AltFt,GridRef1,GridRef2,Longitude,Latitude,Points,BonusPoints,ValidFrom,ValidTo,ActivationCount,ActivationDate,ActivationCall";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut out = String::from("SOTA Summits List (Date=01/04/2024)\n");
        out.push_str(HEADER);
        out.push('\n');
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    const SCAFELL: &str = "G/LD-001,England,Lake District,Scafell Pike,978,3209,NY215072,,-3.2117,54.4542,10,0,01/01/2002,31/12/2099,1234,12/03/2024,M0ABC";
    const TARNICA: &str = "SP/BZ-001,Poland,Bieszczady,Tarnica,1346,4416,22.7263,49.0749,22.7263,49.0749,10,3,01/07/2005,31/12/2099,512,,";

    #[test]
    fn loads_rows_and_skips_title_line() {
        let csv = csv_with_rows(&[SCAFELL, TARNICA]);
        let table = SummitTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let scafell = table.get("G/LD-001").unwrap();
        assert_eq!(scafell.summit_name, "Scafell Pike");
        assert_eq!(scafell.alt_m, 978);
        assert!((scafell.latitude - 54.4542).abs() < f64::EPSILON);
        assert!((scafell.longitude - -3.2117).abs() < f64::EPSILON);
        assert_eq!(scafell.activation_call.as_deref(), Some("M0ABC"));

        let tarnica = table.get("SP/BZ-001").unwrap();
        assert_eq!(tarnica.points, 10);
        assert!(tarnica.activation_date.is_none());
    }

    #[test]
    fn lookup_ignores_case() {
        let csv = csv_with_rows(&[SCAFELL]);
        let table = SummitTable::from_reader(csv.as_bytes()).unwrap();
        assert!(table.contains("g/ld-001"));
        assert!(table.contains(" G/LD-001 "));
        assert!(!table.contains("G/LD-002"));
    }

    #[test]
    fn malformed_row_is_fatal() {
        let bad = "G/LD-002,England,Lake District,Scafell,964,3163,NY206064,,-3.2250,54.4469,ten,0,01/01/2002,31/12/2099,1,,";
        let csv = csv_with_rows(&[SCAFELL, bad]);
        let err = SummitTable::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            SummitError::Row { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_row_is_fatal() {
        let csv = csv_with_rows(&["G/LD-003,England,Lake District"]);
        assert!(matches!(
            SummitTable::from_reader(csv.as_bytes()),
            Err(SummitError::Row { .. })
        ));
    }

    #[test]
    fn narrow_header_is_rejected() {
        let csv = "SOTA Summits List (Date=01/04/2024)\nSummitCode,SummitName,Points\nG/LD-001,Scafell Pike,10\n";
        match SummitTable::from_reader(csv.as_bytes()) {
            Err(SummitError::Columns { found }) => assert_eq!(found, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            SummitTable::from_reader(&b""[..]),
            Err(SummitError::Empty)
        ));
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let renamed = SCAFELL.replace("Scafell Pike", "Scafell Pike (new)");
        let csv = csv_with_rows(&[SCAFELL, &renamed]);
        let table = SummitTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("G/LD-001").unwrap().summit_name, "Scafell Pike (new)");
    }
}
