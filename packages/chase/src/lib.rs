#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Chase log pipeline.
//!
//! Reads an ADIF log, counts QSOs per SOTA summit, resolves each summit
//! through a [`SotaSource`], and works out where the chaser operated from.
//! The result is a [`ChaseReport`] ready to be drawn on a map.

pub mod adif;
pub mod colormap;
pub mod maidenhead;
pub mod text;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use sota_map_source::SotaSource;
use sota_map_source::progress::ProgressCallback;

use crate::adif::{AdifError, AdifLog, parse_adif};

/// ADIF field holding the chased summit reference.
pub const SOTA_REF_FIELD: &str = "SOTA_REF";

/// ADIF field holding the chaser's own locator.
pub const MY_GRIDSQUARE_FIELD: &str = "MY_GRIDSQUARE";

/// Errors that can occur in the chase pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ChaseError {
    /// The log could not be read or the working copy written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The log is not valid ADIF.
    #[error("ADIF parse error: {0}")]
    Adif(#[from] AdifError),

    /// The configured fallback encoding is not a known label.
    #[error("Unknown log encoding {label:?}")]
    UnknownEncoding {
        /// The label as configured.
        label: String,
    },

    /// No record in the log carries a summit reference.
    #[error("No SOTA chases found in log.")]
    NoChases,

    /// Every summit lookup failed.
    #[error("None of the {0} chased summits could be resolved")]
    NoResolvedSummits(usize),
}

/// QSO count for one summit reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummitChases {
    /// Upper-cased summit reference.
    pub summit_code: String,
    /// Number of QSOs with this summit.
    pub chases: u32,
}

/// SOTA-relevant content of a log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChaseLog {
    /// Unique summits in order of first appearance.
    pub summits: Vec<SummitChases>,
    /// `MY_GRIDSQUARE` of every SOTA record that has one, in log order.
    pub locators: Vec<String>,
}

impl ChaseLog {
    /// Total QSOs with a summit reference.
    #[must_use]
    pub fn total_chases(&self) -> u32 {
        self.summits.iter().map(|s| s.chases).sum()
    }
}

/// Extracts summit chases from a parsed log.
///
/// # Errors
///
/// Returns [`ChaseError::NoChases`] if no record has a `SOTA_REF`.
pub fn collect_chases(adif: &AdifLog) -> Result<ChaseLog, ChaseError> {
    let mut chase_log = ChaseLog::default();

    for record in &adif.records {
        let Some(reference) = record.get_non_empty(SOTA_REF_FIELD) else {
            continue;
        };
        let code = reference.to_uppercase();

        match chase_log.summits.iter_mut().find(|s| s.summit_code == code) {
            Some(existing) => existing.chases += 1,
            None => chase_log.summits.push(SummitChases {
                summit_code: code,
                chases: 1,
            }),
        }

        if let Some(locator) = record.get_non_empty(MY_GRIDSQUARE_FIELD) {
            chase_log.locators.push(locator.to_string());
        }
    }

    if chase_log.summits.is_empty() {
        return Err(ChaseError::NoChases);
    }

    log::info!(
        "{} SOTA chases of {} summits found in log",
        chase_log.total_chases(),
        chase_log.summits.len()
    );
    Ok(chase_log)
}

/// Reads, decodes, and parses a log file into a [`ChaseLog`].
///
/// # Errors
///
/// Returns [`ChaseError`] if the encoding label is unknown, the file cannot
/// be read, it is not valid ADIF, or it has no SOTA chases.
pub fn load_chase_log(
    path: &Path,
    encoding_label: &str,
    working_copy: Option<&Path>,
) -> Result<ChaseLog, ChaseError> {
    let encoding = text::resolve_encoding(encoding_label)?;
    let contents = text::read_log(path, encoding, working_copy)?;
    let adif = parse_adif(&contents)?;
    log::debug!("Parsed {} ADIF records from {}", adif.records.len(), path.display());
    collect_chases(&adif)
}

/// A summit from the log, resolved to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChasedSummit {
    /// Summit reference.
    pub summit_code: String,
    /// Summit name.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Activation points.
    pub points: u32,
    /// QSOs with this summit.
    pub chases: u32,
    /// `chases` divided by the highest count among resolved summits.
    pub relative_chases: f64,
}

/// A place the chaser operated from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaserLocation {
    /// Locator as logged.
    pub locator: String,
    /// South-west corner latitude.
    pub latitude: f64,
    /// South-west corner longitude.
    pub longitude: f64,
}

/// A summit that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummitLookupFailure {
    /// Summit reference.
    pub summit_code: String,
    /// Error description.
    pub message: String,
}

/// Everything needed to draw the chases map.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseReport {
    /// Resolved summits in log order.
    pub summits: Vec<ChasedSummit>,
    /// Summits excluded because their lookup failed.
    pub failures: Vec<SummitLookupFailure>,
    /// Most frequent locator in the log.
    pub home: Option<ChaserLocation>,
    /// Other distinct locators, excluding any at the home position.
    pub field_locations: Vec<ChaserLocation>,
    /// Map center: home, else the most-chased summit.
    pub center: (f64, f64),
}

/// Looks up every chased summit and assembles the report.
///
/// Lookups run one at a time. A failed lookup is logged and recorded in
/// [`ChaseReport::failures`]; the summit is left out.
///
/// # Errors
///
/// Returns [`ChaseError::NoResolvedSummits`] if no lookup succeeds.
pub async fn resolve_summits<S: SotaSource + ?Sized>(
    source: &S,
    chase_log: &ChaseLog,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ChaseReport, ChaseError> {
    progress.set_total(chase_log.summits.len() as u64);

    let mut resolved = Vec::with_capacity(chase_log.summits.len());
    let mut failures = Vec::new();

    for entry in &chase_log.summits {
        progress.set_message(entry.summit_code.clone());
        match source.fetch_summit(&entry.summit_code).await {
            Ok(summit) => resolved.push((summit, entry.chases)),
            Err(e) => failures.push(SummitLookupFailure {
                summit_code: entry.summit_code.clone(),
                message: e.to_string(),
            }),
        }
        progress.inc(1);
    }

    progress.finish(format!(
        "Resolved {} of {} summits",
        resolved.len(),
        chase_log.summits.len()
    ));

    if !failures.is_empty() {
        log::warn!(
            "{} summit lookup(s) failed, their QSOs are left off the map",
            failures.len()
        );
        for failure in &failures {
            log::warn!("Error {} for {}.", failure.message, failure.summit_code);
        }
    }

    if resolved.is_empty() {
        return Err(ChaseError::NoResolvedSummits(chase_log.summits.len()));
    }

    let summits = chased_summits(resolved);
    let (home, field_locations) = chaser_locations(&chase_log.locators);
    let center = home.as_ref().map_or_else(
        || most_chased(&summits),
        |h| (h.latitude, h.longitude),
    );

    Ok(ChaseReport {
        summits,
        failures,
        home,
        field_locations,
        center,
    })
}

fn chased_summits(resolved: Vec<(sota_map_summit_models::ApiSummit, u32)>) -> Vec<ChasedSummit> {
    let max = resolved.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
    resolved
        .into_iter()
        .map(|(summit, chases)| ChasedSummit {
            summit_code: summit.summit_code,
            name: summit.name,
            latitude: summit.latitude,
            longitude: summit.longitude,
            points: summit.points,
            chases,
            relative_chases: f64::from(chases) / f64::from(max),
        })
        .collect()
}

fn most_chased(summits: &[ChasedSummit]) -> (f64, f64) {
    summits
        .iter()
        .fold(None::<&ChasedSummit>, |best, s| match best {
            Some(b) if b.chases >= s.chases => Some(b),
            _ => Some(s),
        })
        .map_or((0.0, 0.0), |s| (s.latitude, s.longitude))
}

/// Splits logged locators into the home location and field locations.
///
/// Home is the most frequent locator (first seen wins a tie). Field
/// locations are the other distinct locators whose coordinates differ from
/// home. Locators that fail to convert are skipped with a warning.
#[must_use]
pub fn chaser_locations(locators: &[String]) -> (Option<ChaserLocation>, Vec<ChaserLocation>) {
    let mut distinct: Vec<(ChaserLocation, usize)> = Vec::new();

    for locator in locators {
        if let Some((_, count)) = distinct
            .iter_mut()
            .find(|(l, _)| l.locator.eq_ignore_ascii_case(locator))
        {
            *count += 1;
            continue;
        }
        match maidenhead::to_location(locator) {
            Ok((latitude, longitude)) => distinct.push((
                ChaserLocation {
                    locator: locator.clone(),
                    latitude,
                    longitude,
                },
                1,
            )),
            Err(e) => log::warn!("Skipping locator: {e}"),
        }
    }

    let home_index = distinct
        .iter()
        .enumerate()
        .fold(None::<(usize, usize)>, |best, (i, (_, n))| match best {
            Some((_, best_n)) if best_n >= *n => best,
            _ => Some((i, *n)),
        })
        .map(|(i, _)| i);

    let Some(home_index) = home_index else {
        return (None, Vec::new());
    };

    let home = distinct[home_index].0.clone();
    let field = distinct
        .into_iter()
        .map(|(l, _)| l)
        .filter(|l| (l.latitude, l.longitude) != (home.latitude, home.longitude))
        .collect();

    (Some(home), field)
}
