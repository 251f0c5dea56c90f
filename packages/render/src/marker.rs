//! Map markers and their construction from spots and chases.

use serde::{Serialize, Serializer};
use sota_map_chase::colormap::StepColormap;
use sota_map_chase::{ChasedSummit, ChaserLocation};
use sota_map_spot_models::EnrichedSpot;

/// Radius multiplier for the static activations map.
pub const STATIC_RADIUS_SCALE: f64 = 15.0;

/// Radius multiplier for the live dashboard.
pub const DASHBOARD_RADIUS_SCALE: f64 = 30.0;

/// Smallest radius a spot marker is drawn with, in pixels.
pub const MIN_SPOT_RADIUS: f64 = 1.0;

/// Radius multiplier for chased summits, applied to the relative share.
pub const CHASE_RADIUS_SCALE: f64 = 20.0;

/// Circle color for field locations.
pub const FIELD_QTH_COLOR: &str = "dodgerblue";

/// A Leaflet circle marker with radius in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Border color; Leaflet's default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fill color; the border color when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Border width in pixels.
    pub weight: f64,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// Plain-text popup; serialized as escaped HTML with `<br>` line breaks.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_popup"
    )]
    pub popup: Option<String>,
}

/// A Leaflet pin marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinMarker {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Plain-text popup.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_popup"
    )]
    pub popup: Option<String>,
    /// Pin glyph drawn inside the marker, e.g. `"home"`.
    pub icon: String,
}

/// Escapes popup text for HTML and turns line breaks into `<br>`.
#[must_use]
pub fn popup_html(text: &str) -> String {
    html_escape::encode_text(text).replace('\n', "<br>")
}

#[allow(clippy::ref_option)]
fn serialize_popup<S: Serializer>(popup: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match popup {
        Some(text) => serializer.serialize_some(&popup_html(text)),
        None => serializer.serialize_none(),
    }
}

/// Builds the marker for a placed spot.
///
/// Radius shrinks linearly with age: `(1 - hours_since_spot) * radius_scale`,
/// never below [`MIN_SPOT_RADIUS`]. Fill is the band color and border the
/// mode color. Returns `None` for spots without a placement.
#[must_use]
pub fn spot_marker(spot: &EnrichedSpot, radius_scale: f64) -> Option<CircleMarker> {
    let placement = spot.placement.as_ref()?;
    Some(CircleMarker {
        latitude: placement.latitude,
        longitude: placement.longitude,
        radius: ((1.0 - placement.hours_since_spot) * radius_scale).max(MIN_SPOT_RADIUS),
        color: spot.mode_color().map(str::to_string),
        fill_color: spot.band_color().map(str::to_string),
        weight: 3.0,
        fill_opacity: 1.0,
        popup: Some(placement.popup.clone()),
    })
}

/// Builds markers for every placed spot, in input order.
#[must_use]
pub fn spot_markers<'a>(
    spots: impl IntoIterator<Item = &'a EnrichedSpot>,
    radius_scale: f64,
) -> Vec<CircleMarker> {
    spots
        .into_iter()
        .filter_map(|s| spot_marker(s, radius_scale))
        .collect()
}

/// Builds the marker for a chased summit, colored by its points.
#[must_use]
pub fn chased_summit_marker(summit: &ChasedSummit, colormap: &StepColormap) -> CircleMarker {
    CircleMarker {
        latitude: summit.latitude,
        longitude: summit.longitude,
        radius: CHASE_RADIUS_SCALE * summit.relative_chases,
        color: Some(colormap.hex_at(f64::from(summit.points))),
        fill_color: None,
        weight: 0.0,
        fill_opacity: 1.0,
        popup: Some(format!(
            "{},\n{}\n{} QSOs",
            summit.summit_code, summit.name, summit.chases
        )),
    }
}

/// Builds the pin for the chaser's home location.
#[must_use]
pub fn home_marker(home: &ChaserLocation) -> PinMarker {
    PinMarker {
        latitude: home.latitude,
        longitude: home.longitude,
        popup: Some(format!("home QTH: {}", home.locator)),
        icon: "home".to_string(),
    }
}

/// Builds the circle for a location the chaser operated from away from home.
#[must_use]
pub fn field_marker(location: &ChaserLocation) -> CircleMarker {
    CircleMarker {
        latitude: location.latitude,
        longitude: location.longitude,
        radius: 5.0,
        color: Some(FIELD_QTH_COLOR.to_string()),
        fill_color: None,
        weight: 0.0,
        fill_opacity: 1.0,
        popup: Some("field QTH".to_string()),
    }
}
