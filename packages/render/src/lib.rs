#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Map documents for the activations and chases maps.
//!
//! A [`MapDocument`] describes everything drawn on a Leaflet map: view,
//! tile layer, markers and an optional legend. [`html`] turns it into a
//! single self-contained HTML file.

pub mod html;
pub mod marker;

use serde::Serialize;
use sota_map_chase::ChaseReport;
use sota_map_chase::colormap::points_colormap;
use sota_map_spot_models::EnrichedSpot;

use crate::marker::{
    CircleMarker, PinMarker, STATIC_RADIUS_SCALE, chased_summit_marker, field_marker, home_marker,
    spot_markers,
};

/// Errors that can occur while rendering a map.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The document could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Center the activation maps start on.
pub const DEFAULT_CENTER: (f64, f64) = (50.0, 20.0);

/// Initial zoom of the static activations map.
pub const STATIC_ZOOM: u8 = 2;

/// Initial zoom of the dashboard map.
pub const DASHBOARD_ZOOM: u8 = 3;

/// Initial zoom of the chases map.
pub const CHASES_ZOOM: u8 = 9;

/// Initial map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    /// `(latitude, longitude)`.
    pub center: (f64, f64),
    /// Leaflet zoom level.
    pub zoom: u8,
}

/// A raster tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    /// Attribution HTML shown in the map corner.
    pub attribution: String,
    /// Highest zoom the source serves.
    pub max_zoom: u8,
}

impl TileLayer {
    /// `OpenStreetMap` standard tiles.
    #[must_use]
    pub fn open_street_map() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            max_zoom: 19,
        }
    }

    /// Terrain tiles at `url_template`, attributed to `OpenTopoMap`.
    #[must_use]
    pub fn terrain(url_template: &str) -> Self {
        Self {
            url_template: url_template.to_string(),
            attribution: "Map data: &copy; OpenStreetMap contributors, SRTM | Map style: &copy; OpenTopoMap (CC-BY-SA)".to_string(),
            max_zoom: 17,
        }
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Row text.
    pub label: String,
    /// CSS color.
    pub color: String,
}

/// A color legend drawn in the map corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    /// Legend heading.
    pub title: String,
    /// Rows, top to bottom.
    pub entries: Vec<LegendEntry>,
}

/// Everything drawn on one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    /// Page title.
    pub title: String,
    /// Initial view.
    pub view: MapView,
    /// Background tiles.
    pub tiles: TileLayer,
    /// Circle markers in drawing order.
    pub circles: Vec<CircleMarker>,
    /// Pin markers, drawn above circles.
    pub pins: Vec<PinMarker>,
    /// Optional legend.
    pub legend: Option<Legend>,
}

/// Builds the static activations map: one circle per placed spot.
#[must_use]
pub fn spots_document(spots: &[EnrichedSpot]) -> MapDocument {
    let circles = spot_markers(spots, STATIC_RADIUS_SCALE);
    log::debug!("{} of {} spots placed on the map", circles.len(), spots.len());

    MapDocument {
        title: "SOTA activations".to_string(),
        view: MapView {
            center: DEFAULT_CENTER,
            zoom: STATIC_ZOOM,
        },
        tiles: TileLayer::open_street_map(),
        circles,
        pins: Vec::new(),
        legend: None,
    }
}

/// Builds the chases map from a resolved chase report.
#[must_use]
pub fn chases_document(report: &ChaseReport, tiles: TileLayer) -> MapDocument {
    let colormap = points_colormap();

    let mut circles: Vec<CircleMarker> = report
        .summits
        .iter()
        .map(|s| chased_summit_marker(s, &colormap))
        .collect();
    circles.extend(report.field_locations.iter().map(field_marker));

    let legend = Legend {
        title: "Summit points".to_string(),
        entries: colormap
            .legend()
            .into_iter()
            .map(|step| LegendEntry {
                label: format!("{:.1} - {:.1}", step.lower, step.upper),
                color: step.color,
            })
            .collect(),
    };

    MapDocument {
        title: "SOTA chases".to_string(),
        view: MapView {
            center: report.center,
            zoom: CHASES_ZOOM,
        },
        tiles,
        circles,
        pins: report.home.iter().map(home_marker).collect(),
        legend: Some(legend),
    }
}
