#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summit reference types.
//!
//! [`SummitEntry`] mirrors one row of the published `summitslist.csv`
//! (17 columns). [`ApiSummit`] is the per-summit record served by
//! `GET /api/summits/{code}`.

use serde::{Deserialize, Serialize};

/// One row of the summits reference CSV.
///
/// Column order and names follow the published file. Dates are kept as
/// the raw `DD/MM/YYYY` strings since nothing downstream interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummitEntry {
    /// Full reference, e.g. `"G/LD-001"`.
    pub summit_code: String,
    /// Association name, e.g. `"England"`.
    pub association_name: String,
    /// Region name, e.g. `"Lake District"`.
    pub region_name: String,
    /// Summit name, e.g. `"Scafell Pike"`.
    pub summit_name: String,
    /// Altitude in metres.
    pub alt_m: i32,
    /// Altitude in feet.
    pub alt_ft: i32,
    /// First grid reference component (national grid easting or longitude).
    pub grid_ref1: String,
    /// Second grid reference component.
    pub grid_ref2: String,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Activation points.
    pub points: u32,
    /// Seasonal bonus points.
    pub bonus_points: u32,
    /// First day the reference is valid.
    pub valid_from: String,
    /// Last day the reference is valid.
    pub valid_to: String,
    /// Number of recorded activations.
    pub activation_count: u32,
    /// Date of the most recent activation, if any.
    pub activation_date: Option<String>,
    /// Callsign of the most recent activator, if any.
    pub activation_call: Option<String>,
}

/// Number of columns in the summits reference CSV.
pub const SUMMIT_CSV_COLUMNS: usize = 17;

/// A summit as returned by `GET /api/summits/{code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummit {
    /// Full reference, e.g. `"G/LD-001"`.
    pub summit_code: String,
    /// Summit name.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Activation points.
    pub points: u32,
    /// Altitude in metres.
    #[serde(default)]
    pub alt_m: Option<i32>,
    /// Region name.
    #[serde(default)]
    pub region_name: Option<String>,
    /// Association name.
    #[serde(default)]
    pub association_name: Option<String>,
    /// Number of recorded activations.
    #[serde(default)]
    pub activation_count: Option<u32>,
}
