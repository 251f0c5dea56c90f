//! Deduplication of spots per (activator, summit).

use std::collections::BTreeSet;

use sota_map_spot_models::Spot;

/// Collapses spots to one per (activator, summit) key.
///
/// The survivor for each key is the one at the latest position in the
/// input. Survivors keep the relative order of those last occurrences.
#[must_use]
pub fn dedup_spots(spots: Vec<Spot>) -> Vec<Spot> {
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut kept: Vec<Spot> = Vec::with_capacity(spots.len());

    for spot in spots.into_iter().rev() {
        let (call, summit) = spot.dedup_key();
        if seen.insert((call.to_string(), summit.to_string())) {
            kept.push(spot);
        }
    }

    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn spot(call: &str, summit: &str, freq: f64) -> Spot {
        Spot {
            activator_callsign: call.to_string(),
            summit_code: summit.to_string(),
            frequency_mhz: freq,
            mode: "CW".to_string(),
            spotted_at: Utc.with_ymd_and_hms(2024, 5, 11, 10, 0, 0).unwrap(),
            comments: None,
        }
    }

    #[test]
    fn keeps_last_occurrence_per_key() {
        let spots = vec![
            spot("SP9ABC", "SP/BZ-001", 7.032),
            spot("M0XYZ", "G/LD-001", 10.118),
            spot("SP9ABC", "SP/BZ-001", 14.062),
            spot("SP9ABC", "SP/BZ-002", 14.062),
            spot("SP9ABC", "SP/BZ-001", 21.062),
        ];

        let kept = dedup_spots(spots);
        assert_eq!(kept.len(), 3);

        let bz1: Vec<&Spot> = kept
            .iter()
            .filter(|s| s.dedup_key() == ("SP9ABC", "SP/BZ-001"))
            .collect();
        assert_eq!(bz1.len(), 1);
        assert!((bz1[0].frequency_mhz - 21.062).abs() < f64::EPSILON);
    }

    #[test]
    fn preserves_order_of_last_occurrences() {
        let spots = vec![
            spot("A", "X/1", 1.0),
            spot("B", "X/1", 2.0),
            spot("A", "X/1", 3.0),
        ];
        let kept = dedup_spots(spots);
        let calls: Vec<&str> = kept.iter().map(|s| s.activator_callsign.as_str()).collect();
        assert_eq!(calls, ["B", "A"]);
    }

    #[test]
    fn same_activator_on_different_summits_is_kept() {
        let spots = vec![spot("A", "X/1", 1.0), spot("A", "X/2", 1.0)];
        assert_eq!(dedup_spots(spots).len(), 2);
    }
}
