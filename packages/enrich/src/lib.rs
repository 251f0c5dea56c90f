#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spot enrichment pipeline.
//!
//! Turns raw API spots into map-ready [`EnrichedSpot`]s:
//!
//! 1. [`normalize::normalize_spots`] coerces frequency, mode, summit
//!    reference and timestamp
//! 2. [`dedup::dedup_spots`] keeps the last spot per (activator, summit)
//! 3. [`join::enrich_spots`] joins against the [`SummitTable`], classifies
//!    band and mode, and derives freshness and popup text
//!
//! Spots whose summit is missing from the table are kept unplaced and
//! reported as [`SummitMiss`]es instead of failing the run.

pub mod classify;
pub mod dedup;
pub mod error_log;
pub mod join;
pub mod normalize;

use chrono::{DateTime, Utc};
use sota_map_spot_models::{EnrichedSpot, RawSpot, SummitMiss};
use sota_map_summit::SummitTable;

/// Errors that can stop the enrichment pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Nothing to enrich, even after the fallback fetch.
    #[error("No spots found")]
    NoSpots,

    /// The error log could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output of one enrichment run.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    /// Every deduplicated spot, placed or not.
    pub spots: Vec<EnrichedSpot>,
    /// One entry per spot whose summit was not found.
    pub misses: Vec<SummitMiss>,
}

impl Enrichment {
    /// Iterates spots that have a placement.
    pub fn placed(&self) -> impl Iterator<Item = &EnrichedSpot> {
        self.spots.iter().filter(|s| s.is_placed())
    }
}

/// Runs normalize → dedup → enrich over a batch of raw spots.
///
/// # Errors
///
/// Returns [`EnrichError::NoSpots`] if no spot survives normalization.
pub fn run_pipeline(
    raw: &[RawSpot],
    table: &SummitTable,
    now: DateTime<Utc>,
) -> Result<Enrichment, EnrichError> {
    let spots = normalize::normalize_spots(raw);
    if spots.is_empty() {
        return Err(EnrichError::NoSpots);
    }

    let spots = dedup::dedup_spots(spots);
    log::info!("{} spots found without duplicates.", spots.len());

    let enrichment = join::enrich_spots(spots, table, now);
    log::info!(
        "{} spots placed, {} summits not found",
        enrichment.placed().count(),
        enrichment.misses.len()
    );
    Ok(enrichment)
}
