#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the SOTA spots dashboard.
//!
//! These types are serialized to JSON for the dashboard endpoints. Marker
//! geometry comes from `sota_map_render` so the static map and the
//! dashboard draw identical circles.

use serde::{Deserialize, Serialize};
use sota_map_render::marker::CircleMarker;
use sota_map_spot_models::{BANDS, EnrichedSpot, Mode};
use strum_macros::{AsRefStr, Display};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` while the server is up.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of spots held in memory.
    pub spots: usize,
}

/// Query parameters for the markers endpoint.
///
/// Each parameter is a comma-separated list. An absent parameter leaves
/// that dimension unfiltered; a present but empty one selects nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkerQueryParams {
    /// Band labels, e.g. `"14 MHz,7 MHz"`.
    pub bands: Option<String>,
    /// Mode labels, e.g. `"CW,SSB"`.
    pub modes: Option<String>,
}

/// Whether a marker layer reflects a user selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FilterState {
    /// Every spot, as on first page load.
    Unfiltered,
    /// Spots narrowed by band and/or mode.
    Filtered,
}

/// Band and mode selection applied to the resident spot table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotFilter {
    /// Selected band labels, `None` for every spot regardless of band.
    pub bands: Option<Vec<String>>,
    /// Selected mode labels, `None` for every spot regardless of mode.
    pub modes: Option<Vec<String>>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<&MarkerQueryParams> for SpotFilter {
    fn from(params: &MarkerQueryParams) -> Self {
        Self {
            bands: params.bands.as_deref().map(split_list),
            modes: params.modes.as_deref().map(split_list),
        }
    }
}

impl SpotFilter {
    /// Returns the filter state this selection puts the dashboard in.
    #[must_use]
    pub const fn state(&self) -> FilterState {
        if self.bands.is_none() && self.modes.is_none() {
            FilterState::Unfiltered
        } else {
            FilterState::Filtered
        }
    }

    /// Returns `true` if `spot` passes both dimensions.
    ///
    /// Once a dimension is filtered, spots without a value for it (no band,
    /// or a mode outside the table) never pass.
    #[must_use]
    pub fn matches(&self, spot: &EnrichedSpot) -> bool {
        let band_ok = self.bands.as_ref().is_none_or(|bands| {
            spot.band_label()
                .is_some_and(|label| bands.iter().any(|b| b.eq_ignore_ascii_case(label)))
        });
        let mode_ok = self.modes.as_ref().is_none_or(|modes| {
            spot.mode
                .is_some_and(|mode| modes.iter().any(|m| m.eq_ignore_ascii_case(mode.as_ref())))
        });
        band_ok && mode_ok
    }

    /// Returns the spots that pass the filter, in table order.
    pub fn apply<'a>(&'a self, spots: &'a [EnrichedSpot]) -> impl Iterator<Item = &'a EnrichedSpot> {
        spots.iter().filter(move |s| self.matches(s))
    }
}

/// A freshly generated marker layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMarkerLayer {
    /// Whether a selection was applied.
    pub state: FilterState,
    /// Spots that passed the filter, placed or not.
    pub matched: usize,
    /// Circle markers for the placed spots among them.
    pub markers: Vec<CircleMarker>,
}

/// Filter options offered by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilters {
    /// Every band label, in table order.
    pub bands: Vec<String>,
    /// Every mode label, in table order.
    pub modes: Vec<String>,
    /// Bands selected on first load.
    pub selected_bands: Vec<String>,
    /// Modes selected on first load.
    pub selected_modes: Vec<String>,
}

impl Default for ApiFilters {
    /// All options available and all of them selected.
    fn default() -> Self {
        let bands: Vec<String> = BANDS.iter().map(|b| b.label.to_string()).collect();
        let modes: Vec<String> = Mode::all().iter().map(ToString::to_string).collect();
        Self {
            selected_bands: bands.clone(),
            selected_modes: modes.clone(),
            bands,
            modes,
        }
    }
}
