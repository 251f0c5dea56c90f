//! HTTP handler functions for the dashboard.

use actix_web::{HttpResponse, web};
use sota_map_render::marker::{DASHBOARD_RADIUS_SCALE, spot_markers};
use sota_map_server_models::{ApiFilters, ApiHealth, ApiMarkerLayer, MarkerQueryParams, SpotFilter};

use crate::AppState;

/// `GET /`
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(state.page.clone())
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        spots: state.spots.len(),
    })
}

/// `GET /api/filters`
///
/// Lists every band and mode, all selected.
pub async fn filters() -> HttpResponse {
    HttpResponse::Ok().json(ApiFilters::default())
}

/// `GET /api/markers`
///
/// Rebuilds the marker layer for the selected bands and modes.
pub async fn markers(
    state: web::Data<AppState>,
    params: web::Query<MarkerQueryParams>,
) -> HttpResponse {
    let filter = SpotFilter::from(&*params);
    let matched: Vec<_> = filter.apply(&state.spots).collect();
    let markers = spot_markers(matched.iter().copied(), DASHBOARD_RADIUS_SCALE);

    log::debug!(
        "{} filter: {} spots matched, {} markers",
        filter.state(),
        matched.len(),
        markers.len()
    );

    HttpResponse::Ok().json(ApiMarkerLayer {
        state: filter.state(),
        matched: matched.len(),
        markers,
    })
}
