//! The three map runs: static activations, dashboard, and chases.
//!
//! Each run reports an empty input (no spots, no chases) with a message
//! and returns `Ok` without producing an artifact.

use std::path::Path;

use chrono::Utc;
use sota_map_chase::{ChaseError, load_chase_log, resolve_summits};
use sota_map_cli_utils::{IndicatifProgress, MultiProgress};
use sota_map_config::Settings;
use sota_map_enrich::error_log::append_error_log;
use sota_map_enrich::{EnrichError, Enrichment, run_pipeline};
use sota_map_render::html::write_html;
use sota_map_render::{TileLayer, chases_document, spots_document};
use sota_map_source::api::SotaApi;
use sota_map_source::{Lookback, fetch_spots_with_fallback};
use sota_map_summit::load_summits_csv;

use crate::BoxError;

/// Fetches spots and loads the summit table side by side, then enriches.
///
/// Returns `None` when there are no spots to show.
async fn enrich_latest(
    multi: &MultiProgress,
    settings: &Settings,
) -> Result<Option<Enrichment>, BoxError> {
    let stages = IndicatifProgress::stages_bar(multi, "Fetching spots", 2);
    let api = SotaApi::new(&settings.api_base_url)?;
    let lookback = Lookback(settings.spots.lookback);

    let summits_csv = settings.summits_csv.clone();
    let (raw, table) = tokio::join!(
        fetch_spots_with_fallback(&api, lookback),
        tokio::task::spawn_blocking(move || load_summits_csv(&summits_csv)),
    );
    let raw = raw?;
    let table = table??;
    stages.inc(1);

    stages.set_message("Enriching spots".to_string());
    let enrichment = match run_pipeline(&raw, &table, Utc::now()) {
        Ok(enrichment) => enrichment,
        Err(EnrichError::NoSpots) => {
            stages.finish("No spots".to_string());
            println!("No spots found, nothing to map.");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    stages.inc(1);

    append_error_log(&settings.errors_log, &enrichment.misses)?;
    stages.finish(format!("{} spots enriched", enrichment.spots.len()));
    Ok(Some(enrichment))
}

/// Writes the static activations map.
///
/// # Errors
///
/// Returns an error if fetching, loading, enrichment, or writing fails.
pub async fn run_spots(multi: &MultiProgress, settings: &Settings) -> Result<(), BoxError> {
    let Some(enrichment) = enrich_latest(multi, settings).await? else {
        return Ok(());
    };

    let doc = spots_document(&enrichment.spots);
    write_html(&doc, &settings.spots.output)?;
    println!(
        "Saved {} activations to {}",
        doc.circles.len(),
        settings.spots.output.display()
    );
    Ok(())
}

/// Enriches the latest spots and serves them on the dashboard.
///
/// The server runs on its own actix system in a blocking task so it does
/// not nest inside the tokio runtime.
///
/// # Errors
///
/// Returns an error if enrichment fails or the server cannot start.
pub async fn run_dashboard(
    multi: &MultiProgress,
    settings: &Settings,
    interactive: bool,
) -> Result<(), BoxError> {
    let Some(enrichment) = enrich_latest(multi, settings).await? else {
        return Ok(());
    };

    let dashboard = settings.dashboard.clone();
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                sota_map_server::interactive::run(&dashboard, enrichment.spots).await
            } else {
                sota_map_server::run_server(&dashboard, enrichment.spots).await
            }
        })
    })
    .await??;
    Ok(())
}

/// Writes the chases map for an ADIF log.
///
/// # Errors
///
/// Returns an error if the log cannot be read or parsed, no summit can be
/// resolved, or the map cannot be written.
pub async fn run_chases(
    multi: &MultiProgress,
    settings: &Settings,
    log_path: &Path,
) -> Result<(), BoxError> {
    let chases = &settings.chases;
    let chase_log = match load_chase_log(
        log_path,
        &chases.log_encoding,
        chases.working_log.as_deref(),
    ) {
        Ok(chase_log) => chase_log,
        Err(ChaseError::NoChases) => {
            println!("{}", ChaseError::NoChases);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let api = SotaApi::new(&settings.api_base_url)?;
    let progress = IndicatifProgress::lookups_bar(multi, "Looking up summits");
    let report = resolve_summits(&api, &chase_log, &progress).await?;

    let doc = chases_document(&report, TileLayer::terrain(&chases.tiles_url));
    write_html(&doc, &chases.output)?;
    println!(
        "Saved {} chased summits to {}",
        report.summits.len(),
        chases.output.display()
    );
    Ok(())
}
