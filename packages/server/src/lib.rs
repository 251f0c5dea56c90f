#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web live dashboard for SOTA spots.
//!
//! Serves a single page with band and mode multi-selects over a Leaflet
//! map. The page asks `/api/markers` for a freshly built marker layer
//! whenever the selection changes. The enriched spot table is loaded once
//! before the server starts and only read afterwards.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use sota_map_config::DashboardSettings;
use sota_map_render::html::dashboard_html;
use sota_map_render::{DASHBOARD_ZOOM, DEFAULT_CENTER, MapView, TileLayer};
use sota_map_spot_models::EnrichedSpot;

/// Shared application state.
pub struct AppState {
    /// Enriched spots, placed or not, in pipeline order.
    pub spots: Arc<Vec<EnrichedSpot>>,
    /// Pre-rendered dashboard page.
    pub page: String,
}

impl AppState {
    /// Builds the state and renders the dashboard page once.
    ///
    /// # Errors
    ///
    /// Returns an `std::io::Error` if the page cannot be rendered.
    pub fn new(spots: Vec<EnrichedSpot>) -> std::io::Result<Self> {
        let view = MapView {
            center: DEFAULT_CENTER,
            zoom: DASHBOARD_ZOOM,
        };
        let page = dashboard_html("SOTA spots dashboard", &view, &TileLayer::open_street_map())
            .map_err(std::io::Error::other)?;
        Ok(Self {
            spots: Arc::new(spots),
            page,
        })
    }
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/filters", web::get().to(handlers::filters))
            .route("/markers", web::get().to(handlers::markers)),
    );
}

/// Starts the dashboard server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. `actix_web::rt::System`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the page cannot be rendered, the
/// server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(
    settings: &DashboardSettings,
    spots: Vec<EnrichedSpot>,
) -> std::io::Result<()> {
    let placed = spots.iter().filter(|s| s.is_placed()).count();
    let state = web::Data::new(AppState::new(spots)?);

    log::info!(
        "Serving {} spots ({placed} placed) on http://{}:{}",
        state.spots.len(),
        settings.bind_addr,
        settings.port
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((settings.bind_addr.as_str(), settings.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use chrono::{TimeZone as _, Utc};
    use sota_map_server_models::{ApiFilters, ApiHealth};
    use sota_map_spot_models::{Mode, Placement, Spot, band_for_frequency};

    use super::*;

    fn spot(call: &str, frequency_mhz: f64, mode: Mode, placed: bool) -> EnrichedSpot {
        EnrichedSpot {
            spot: Spot {
                activator_callsign: call.to_string(),
                summit_code: "SP/BZ-001".to_string(),
                frequency_mhz,
                mode: mode.to_string(),
                spotted_at: Utc.with_ymd_and_hms(2024, 5, 11, 11, 45, 0).unwrap(),
                comments: None,
            },
            band: band_for_frequency(frequency_mhz),
            mode: Some(mode),
            placement: placed.then(|| Placement {
                latitude: 49.0749,
                longitude: 22.7263,
                summit_name: "Tarnica".to_string(),
                points: 10,
                hours_since_spot: 0.25,
                popup: format!("activated by {call}"),
            }),
        }
    }

    fn state() -> web::Data<AppState> {
        web::Data::new(
            AppState::new(vec![
                spot("SP9AA", 7.032, Mode::Cw, true),
                spot("SP9BB", 14.285, Mode::Ssb, true),
                spot("SP9CC", 7.090, Mode::Ssb, false),
            ])
            .unwrap(),
        )
    }

    async fn get_json(uri: &str) -> serde_json::Value {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_and_read_body_json(&app, req).await
    }

    #[actix_web::test]
    async fn index_serves_the_dashboard_page() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("band_selection"));
    }

    #[actix_web::test]
    async fn health_reports_spot_count() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let health: ApiHealth = test::call_and_read_body_json(&app, req).await;
        assert!(health.healthy);
        assert_eq!(health.spots, 3);
    }

    #[actix_web::test]
    async fn filters_offer_everything_selected() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/filters").to_request();
        let filters: ApiFilters = test::call_and_read_body_json(&app, req).await;
        assert_eq!(filters, ApiFilters::default());
    }

    #[actix_web::test]
    async fn markers_without_parameters_are_unfiltered() {
        let layer = get_json("/api/markers").await;
        assert_eq!(layer["state"], "unfiltered");
        assert_eq!(layer["matched"], 3);
        assert_eq!(layer["markers"].as_array().unwrap().len(), 2);
        assert!((layer["markers"][0]["radius"].as_f64().unwrap() - 22.5).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn markers_filter_by_band_and_mode() {
        let layer = get_json("/api/markers?bands=7%20MHz&modes=cw,ssb").await;
        assert_eq!(layer["state"], "filtered");
        assert_eq!(layer["matched"], 2);
        let markers = layer["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0]["fillColor"], "red");
    }

    #[actix_web::test]
    async fn empty_selection_returns_an_empty_layer() {
        let layer = get_json("/api/markers?bands=").await;
        assert_eq!(layer["state"], "filtered");
        assert_eq!(layer["matched"], 0);
        assert!(layer["markers"].as_array().unwrap().is_empty());
    }
}
