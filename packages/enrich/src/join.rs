//! Join of normalized spots against the summit reference table.

use chrono::{DateTime, Utc};
use sota_map_spot_models::{EnrichedSpot, Placement, Spot, SummitMiss, format_mhz};
use sota_map_summit::SummitTable;
use sota_map_summit_models::SummitEntry;

use crate::Enrichment;
use crate::classify::classify;

/// Enriches every spot with classification and, on a table hit, placement.
///
/// A miss is logged and recorded once per spot; the spot stays in the
/// output without a placement.
#[must_use]
pub fn enrich_spots(spots: Vec<Spot>, table: &SummitTable, now: DateTime<Utc>) -> Enrichment {
    let mut result = Enrichment {
        spots: Vec::with_capacity(spots.len()),
        misses: Vec::new(),
    };

    for spot in spots {
        let classification = classify(spot.frequency_mhz, &spot.mode);

        let placement = if let Some(entry) = table.get(&spot.summit_code) {
            Some(place(&spot, entry, now))
        } else {
            let miss = SummitMiss {
                summit_code: spot.summit_code.clone(),
                activator_callsign: spot.activator_callsign.clone(),
                frequency_mhz: spot.frequency_mhz,
                mode: spot.mode.clone(),
            };
            log::warn!("{miss}");
            result.misses.push(miss);
            None
        };

        result.spots.push(EnrichedSpot {
            spot,
            band: classification.band,
            mode: classification.mode,
            placement,
        });
    }

    result
}

fn place(spot: &Spot, entry: &SummitEntry, now: DateTime<Utc>) -> Placement {
    let hours_since_spot = hours_between(spot.spotted_at, now);
    Placement {
        latitude: entry.latitude,
        longitude: entry.longitude,
        summit_name: entry.summit_name.clone(),
        points: entry.points,
        hours_since_spot,
        popup: popup_text(spot, entry, hours_since_spot),
    }
}

/// Elapsed time from `then` to `now` in fractional hours.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn hours_between(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - then).num_milliseconds() as f64 / 3_600_000.0
}

/// Builds the marker popup for a placed spot.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn popup_text(spot: &Spot, entry: &SummitEntry, hours_since_spot: f64) -> String {
    let minutes = (hours_since_spot * 60.0).round() as i64;
    format!(
        "Summit {} - {} ({} points)\nactivated by {}\non {} - {}\n{minutes} minutes ago\n.",
        title_case(&entry.summit_name),
        spot.summit_code,
        entry.points,
        spot.activator_callsign.to_uppercase(),
        format_mhz(spot.frequency_mhz),
        spot.mode.to_uppercase(),
    )
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts at any letter that follows a non-letter, so
/// `"o'neill's top"` becomes `"O'Neill'S Top"`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn table() -> SummitTable {
        SummitTable::from_entries([SummitEntry {
            summit_code: "G/LD-001".to_string(),
            association_name: "England".to_string(),
            region_name: "Lake District".to_string(),
            summit_name: "SCAFELL PIKE".to_string(),
            alt_m: 978,
            alt_ft: 3209,
            grid_ref1: "NY215072".to_string(),
            grid_ref2: String::new(),
            longitude: -3.2117,
            latitude: 54.4542,
            points: 10,
            bonus_points: 0,
            valid_from: "01/01/2002".to_string(),
            valid_to: "31/12/2099".to_string(),
            activation_count: 1234,
            activation_date: None,
            activation_call: None,
        }])
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 11, 12, 0, 0).unwrap()
    }

    fn spot(call: &str, summit: &str) -> Spot {
        Spot {
            activator_callsign: call.to_string(),
            summit_code: summit.to_string(),
            frequency_mhz: 14.074,
            mode: "CW".to_string(),
            spotted_at: Utc.with_ymd_and_hms(2024, 5, 11, 11, 30, 0).unwrap(),
            comments: None,
        }
    }

    #[test]
    fn hit_copies_reference_coordinates() {
        let result = enrich_spots(vec![spot("m0abc", "G/LD-001")], &table(), now());
        let placement = result.spots[0].placement.as_ref().unwrap();
        assert!((placement.latitude - 54.4542).abs() < f64::EPSILON);
        assert!((placement.longitude - -3.2117).abs() < f64::EPSILON);
        assert_eq!(placement.points, 10);
        assert!((placement.hours_since_spot - 0.5).abs() < 1e-9);
        assert!(result.misses.is_empty());
    }

    #[test]
    fn popup_describes_the_activation() {
        let result = enrich_spots(vec![spot("m0abc", "G/LD-001")], &table(), now());
        let popup = &result.spots[0].placement.as_ref().unwrap().popup;
        assert_eq!(
            popup,
            "Summit Scafell Pike - G/LD-001 (10 points)\nactivated by M0ABC\non 14.074 - CW\n30 minutes ago\n."
        );
    }

    #[test]
    fn popup_shows_whole_frequencies_with_a_decimal() {
        let mut on_seven = spot("m0abc", "G/LD-001");
        on_seven.frequency_mhz = 7.0;
        let result = enrich_spots(vec![on_seven], &table(), now());
        let popup = &result.spots[0].placement.as_ref().unwrap().popup;
        assert!(popup.contains("\non 7.0 - CW\n"), "{popup}");
    }

    #[test]
    fn miss_is_reported_once_and_kept_unplaced() {
        let result = enrich_spots(
            vec![spot("M0ABC", "G/LD-001"), spot("M0XYZ", "G/LD-999")],
            &table(),
            now(),
        );
        assert_eq!(result.spots.len(), 2);
        assert_eq!(result.misses.len(), 1);
        assert_eq!(result.misses[0].summit_code, "G/LD-999");

        let missing = &result.spots[1];
        assert!(missing.placement.is_none());
        assert_eq!(missing.band_label(), Some("14 MHz"));
    }

    #[test]
    fn placement_is_all_or_nothing() {
        let result = enrich_spots(
            vec![spot("A", "G/LD-001"), spot("B", "G/LD-999"), spot("C", "g/ld-001")],
            &table(),
            now(),
        );
        for enriched in &result.spots {
            let hit = table().contains(&enriched.spot.summit_code);
            assert_eq!(enriched.is_placed(), hit);
            if let Some(p) = &enriched.placement {
                assert!(!p.summit_name.is_empty());
                assert!(!p.popup.is_empty());
            }
        }
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("BABIA GÓRA"), "Babia Góra");
        assert_eq!(title_case("pen-y-fan"), "Pen-Y-Fan");
        assert_eq!(title_case("o'neill's top"), "O'Neill'S Top");
    }
}
