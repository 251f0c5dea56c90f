#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spot record types and the band/mode classification tables.
//!
//! A [`RawSpot`] is what the SOTA API returns. Sources normalize it into a
//! [`Spot`], and the enrichment pipeline turns that into an
//! [`EnrichedSpot`] carrying classification and, when the summit is
//! known, a [`Placement`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A spot exactly as returned by `GET /api/spots/{lookback}/all`.
///
/// All fields default to empty so that sparse or partially-populated
/// records still deserialize. Text fields also accept `null` (read as
/// empty) and bare numbers (read as their decimal text), so one odd record
/// cannot fail the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSpot {
    /// Spot identifier assigned by the API.
    pub id: i64,
    /// When the spot was posted (ISO 8601, UTC, usually without offset).
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub time_stamp: String,
    /// Free-text comment left by the spotter.
    pub comments: Option<String>,
    /// Callsign of the operator who posted the spot.
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub callsign: String,
    /// Association part of the summit reference (e.g. `"G"`).
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub association_code: String,
    /// Region and number part of the summit reference (e.g. `"LD-001"`).
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub summit_code: String,
    /// Callsign of the operator on the summit.
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub activator_callsign: String,
    /// Name of the activator, if given.
    pub activator_name: Option<String>,
    /// Frequency in MHz as free text (may be malformed).
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub frequency: String,
    /// Transmission mode as free text (e.g. `"cw"`, `"SSB"`).
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub mode: String,
    /// Summit name and altitude as shown on SOTAwatch.
    pub summit_details: Option<String>,
}

mod lenient_text {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    pub fn deserialize<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Text>::deserialize(d)? {
            None => String::new(),
            Some(Text::Str(s)) => s,
            Some(Text::Int(n)) => n.to_string(),
            Some(Text::Float(n)) => n.to_string(),
            Some(Text::Bool(b)) => b.to_string(),
        })
    }
}

impl RawSpot {
    /// Returns the full summit reference (`ASSOCIATION/SUMMIT`) in upper case.
    #[must_use]
    pub fn full_summit_code(&self) -> String {
        format!("{}/{}", self.association_code.trim(), self.summit_code.trim()).to_uppercase()
    }
}

/// A spot after field coercion, ready for deduplication and enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// Callsign of the activator, as reported.
    pub activator_callsign: String,
    /// Normalized (upper-cased) `ASSOCIATION/SUMMIT` reference.
    pub summit_code: String,
    /// Frequency in MHz. Malformed input is stored as `0.0`.
    pub frequency_mhz: f64,
    /// Upper-cased mode string.
    pub mode: String,
    /// When the spot was posted.
    pub spotted_at: DateTime<Utc>,
    /// Spotter comment, if any.
    pub comments: Option<String>,
}

impl Spot {
    /// Returns the deduplication key: (activator, summit reference).
    #[must_use]
    pub fn dedup_key(&self) -> (&str, &str) {
        (self.activator_callsign.as_str(), self.summit_code.as_str())
    }
}

/// One row of the fixed band table.
///
/// Bounds are in MHz and inclusive on both ends. They are wider than the
/// actual allocations so that band plans from different countries all land
/// in the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandRange {
    /// Display label, also used as the dashboard filter value.
    pub label: &'static str,
    /// Lowest frequency (inclusive) in MHz.
    pub lower_mhz: f64,
    /// Highest frequency (inclusive) in MHz.
    pub upper_mhz: f64,
    /// CSS color name used for the marker fill.
    pub color: &'static str,
}

impl BandRange {
    /// Returns `true` if `frequency_mhz` lies within this band.
    #[must_use]
    pub fn contains(&self, frequency_mhz: f64) -> bool {
        frequency_mhz >= self.lower_mhz && frequency_mhz <= self.upper_mhz
    }
}

const fn band(
    label: &'static str,
    lower_mhz: f64,
    upper_mhz: f64,
    color: &'static str,
) -> BandRange {
    BandRange {
        label,
        lower_mhz,
        upper_mhz,
        color,
    }
}

/// Ordered band table. The lookup takes the first row that matches.
pub const BANDS: &[BandRange] = &[
    band("1.8 MHz or below", 0.0, 2.5, "saddlebrown"),
    band("3.5 MHz", 3.0, 4.0, "chocolate"),
    band("5 MHz", 4.5, 5.5, "brown"),
    band("7 MHz", 6.0, 8.0, "red"),
    band("10 MHz", 9.0, 11.0, "salmon"),
    band("14 MHz", 13.0, 15.0, "orange"),
    band("18 MHz", 16.0, 18.5, "darkkhaki"),
    band("21 MHz", 19.0, 23.0, "yellow"),
    band("24 MHz", 24.0, 26.0, "olivedrab"),
    band("28 MHz", 27.0, 35.0, "green"),
    band("50 MHz", 45.0, 55.0, "lime"),
    band("70 MHz", 65.0, 75.0, "cyan"),
    band("144 MHz", 142.0, 148.0, "blue"),
    band("220 MHz", 210.0, 240.0, "purple"),
    band("433 MHz", 420.0, 460.0, "magenta"),
    band("900 MHz or above", 850.0, 500_000.0, "pink"),
];

/// Formats a frequency in MHz with at least one decimal (`7.0`, `14.062`).
#[must_use]
pub fn format_mhz(frequency_mhz: f64) -> String {
    if frequency_mhz.fract() == 0.0 {
        format!("{frequency_mhz:.1}")
    } else {
        frequency_mhz.to_string()
    }
}

/// Returns the first band whose bounds contain `frequency_mhz`.
///
/// Frequencies that fall into a gap between rows return `None`. A
/// frequency of `0.0` (the replacement for malformed input) always lands in
/// the lowest band.
#[must_use]
pub fn band_for_frequency(frequency_mhz: f64) -> Option<&'static BandRange> {
    BANDS.iter().find(|b| b.contains(frequency_mhz))
}

/// Transmission modes known to the mode color table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    /// Amplitude modulation
    #[serde(rename = "AM")]
    #[strum(serialize = "AM")]
    Am,
    /// Morse code
    #[serde(rename = "CW")]
    #[strum(serialize = "CW")]
    Cw,
    /// Digital data modes (FT8, PSK, RTTY, ...)
    #[serde(rename = "Data")]
    #[strum(serialize = "Data")]
    Data,
    /// Digital voice
    #[serde(rename = "DV")]
    #[strum(serialize = "DV")]
    Dv,
    /// Frequency modulation
    #[serde(rename = "FM")]
    #[strum(serialize = "FM")]
    Fm,
    /// Single sideband
    #[serde(rename = "SSB")]
    #[strum(serialize = "SSB")]
    Ssb,
    /// Anything the spotter labelled "other"
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
}

impl Mode {
    /// Returns the CSS color name used for a marker border.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Am => "lime",
            Self::Cw => "red",
            Self::Data => "cyan",
            Self::Dv => "magenta",
            Self::Fm => "yellow",
            Self::Ssb => "blue",
            Self::Other => "orange",
        }
    }

    /// Returns all variants in table order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Am,
            Self::Cw,
            Self::Data,
            Self::Dv,
            Self::Fm,
            Self::Ssb,
            Self::Other,
        ]
    }

    /// Matches a free-text mode against the table, ignoring case.
    ///
    /// Returns `None` for modes outside the table (e.g. `"SSTV"`).
    #[must_use]
    pub fn from_spot_mode(mode: &str) -> Option<Self> {
        mode.trim().parse().ok()
    }
}

/// Geographic and descriptive data attached to a spot whose summit was
/// found in the reference table.
///
/// Every field is filled in at once, so a spot is either fully placed or
/// not placed at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Summit latitude (WGS84).
    pub latitude: f64,
    /// Summit longitude (WGS84).
    pub longitude: f64,
    /// Summit name from the reference table.
    pub summit_name: String,
    /// SOTA points awarded for the summit.
    pub points: u32,
    /// Hours elapsed between the spot and the enrichment run.
    pub hours_since_spot: f64,
    /// Multi-line popup text for the map marker.
    pub popup: String,
}

/// A spot with classification and optional placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSpot {
    /// The normalized spot.
    pub spot: Spot,
    /// Band matched by frequency, if any.
    pub band: Option<&'static BandRange>,
    /// Mode matched against the table, if any.
    pub mode: Option<Mode>,
    /// Summit placement, `None` when the summit was not found.
    pub placement: Option<Placement>,
}

impl EnrichedSpot {
    /// Returns the band label, if a band was matched.
    #[must_use]
    pub fn band_label(&self) -> Option<&'static str> {
        self.band.map(|b| b.label)
    }

    /// Returns the band fill color, if a band was matched.
    #[must_use]
    pub fn band_color(&self) -> Option<&'static str> {
        self.band.map(|b| b.color)
    }

    /// Returns the mode border color, if the mode is in the table.
    #[must_use]
    pub fn mode_color(&self) -> Option<&'static str> {
        self.mode.map(Mode::color)
    }

    /// Returns `true` if the spot can be drawn on a map.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.placement.is_some()
    }
}

/// A spot whose summit reference was not found in the reference table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummitMiss {
    /// The normalized summit reference that failed to resolve.
    pub summit_code: String,
    /// Activator callsign of the spot.
    pub activator_callsign: String,
    /// Frequency of the spot in MHz.
    pub frequency_mhz: f64,
    /// Mode of the spot.
    pub mode: String,
}

impl std::fmt::Display for SummitMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Summit {} activated by {} on {} - {} NOT FOUND.",
            self.summit_code,
            self.activator_callsign.to_uppercase(),
            format_mhz(self.frequency_mhz),
            self.mode.to_uppercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_bounds_are_inclusive() {
        for band in BANDS {
            assert_eq!(band_for_frequency(band.lower_mhz).map(|b| b.label), Some(band.label));
            assert_eq!(band_for_frequency(band.upper_mhz).map(|b| b.label), Some(band.label));
            assert_eq!(band_for_frequency(band.lower_mhz).map(|b| b.color), Some(band.color));
        }
    }

    #[test]
    fn twenty_metres_is_orange() {
        let band = band_for_frequency(14.074).unwrap();
        assert_eq!(band.label, "14 MHz");
        assert_eq!(band.color, "orange");
    }

    #[test]
    fn zero_frequency_lands_in_lowest_band() {
        assert_eq!(band_for_frequency(0.0).map(|b| b.label), Some(BANDS[0].label));
    }

    #[test]
    fn gap_frequency_has_no_band() {
        assert!(band_for_frequency(2.7).is_none());
        assert!(band_for_frequency(600.0).is_none());
    }

    #[test]
    fn band_labels_are_unique() {
        let mut labels: Vec<&str> = BANDS.iter().map(|b| b.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), BANDS.len());
    }

    #[test]
    fn frequencies_show_at_least_one_decimal() {
        assert_eq!(format_mhz(7.0), "7.0");
        assert_eq!(format_mhz(0.0), "0.0");
        assert_eq!(format_mhz(14.062), "14.062");
        assert_eq!(format_mhz(144.3), "144.3");
    }

    #[test]
    fn miss_message_keeps_one_decimal() {
        let miss = SummitMiss {
            summit_code: "G/LD-999".to_string(),
            activator_callsign: "m0abc".to_string(),
            frequency_mhz: 7.0,
            mode: "cw".to_string(),
        };
        assert_eq!(
            miss.to_string(),
            "Summit G/LD-999 activated by M0ABC on 7.0 - CW NOT FOUND."
        );
    }

    #[test]
    fn mode_matching_ignores_case() {
        assert_eq!(Mode::from_spot_mode("cw"), Some(Mode::Cw));
        assert_eq!(Mode::from_spot_mode("DATA"), Some(Mode::Data));
        assert_eq!(Mode::from_spot_mode(" ssb "), Some(Mode::Ssb));
        assert_eq!(Mode::from_spot_mode("sstv"), None);
        assert_eq!(Mode::Cw.color(), "red");
    }

    #[test]
    fn mode_display_uses_table_labels() {
        let labels: Vec<String> = Mode::all().iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["AM", "CW", "Data", "DV", "FM", "SSB", "Other"]);
    }

    #[test]
    fn raw_spot_deserializes_sparse_records() {
        let json = r#"{"timeStamp":"2024-05-11T10:21:42","associationCode":"g",
            "summitCode":"ld-001","activatorCallsign":"M0ABC","frequency":"7.032","mode":"cw"}"#;
        let raw: RawSpot = serde_json::from_str(json).unwrap();
        assert_eq!(raw.full_summit_code(), "G/LD-001");
        assert!(raw.comments.is_none());
        assert_eq!(raw.id, 0);
    }

    #[test]
    fn raw_spot_batch_survives_null_and_numeric_fields() {
        let json = r#"[
            {"timeStamp":"2024-05-11T10:21:42","associationCode":"G","summitCode":"LD-001",
             "activatorCallsign":"M0ABC","frequency":null,"mode":"cw"},
            {"timeStamp":"2024-05-11T10:22:00","associationCode":"SP","summitCode":null,
             "activatorCallsign":"SP9ABC","frequency":14.062,"mode":null},
            {"timeStamp":"2024-05-11T10:23:00","associationCode":"W7A","summitCode":"MN-001",
             "activatorCallsign":"K7ABC","frequency":7,"mode":"SSB"}
        ]"#;
        let raw: Vec<RawSpot> = serde_json::from_str(json).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].frequency, "");
        assert_eq!(raw[0].mode, "cw");
        assert_eq!(raw[1].frequency, "14.062");
        assert_eq!(raw[1].summit_code, "");
        assert_eq!(raw[1].mode, "");
        assert_eq!(raw[2].frequency, "7");
        assert_eq!(raw[2].full_summit_code(), "W7A/MN-001");
    }
}
