//! Field coercion from [`RawSpot`] to [`Spot`].

use sota_map_source::parsing::{parse_frequency, parse_spot_timestamp};
use sota_map_spot_models::{RawSpot, Spot};

/// Normalizes one raw spot.
///
/// Returns `None` when the timestamp cannot be parsed, since freshness
/// cannot be derived without it.
#[must_use]
pub fn normalize_spot(raw: &RawSpot) -> Option<Spot> {
    let Some(spotted_at) = parse_spot_timestamp(&raw.time_stamp) else {
        log::warn!(
            "Dropping spot {} by {}: unparseable timestamp {:?}",
            raw.id,
            raw.activator_callsign,
            raw.time_stamp
        );
        return None;
    };

    Some(Spot {
        activator_callsign: raw.activator_callsign.trim().to_string(),
        summit_code: raw.full_summit_code(),
        frequency_mhz: parse_frequency(&raw.frequency),
        mode: raw.mode.trim().to_uppercase(),
        spotted_at,
        comments: raw.comments.clone(),
    })
}

/// Normalizes a batch, keeping input order and dropping unusable spots.
#[must_use]
pub fn normalize_spots(raw: &[RawSpot]) -> Vec<Spot> {
    raw.iter().filter_map(normalize_spot).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSpot {
        RawSpot {
            id: 42,
            time_stamp: "2024-05-11T10:21:42".to_string(),
            association_code: "sp".to_string(),
            summit_code: "bz-001 ".to_string(),
            activator_callsign: " SP9ABC".to_string(),
            frequency: "14.o62".to_string(),
            mode: "ssb".to_string(),
            ..RawSpot::default()
        }
    }

    #[test]
    fn coerces_fields() {
        let spot = normalize_spot(&raw()).unwrap();
        assert_eq!(spot.summit_code, "SP/BZ-001");
        assert_eq!(spot.activator_callsign, "SP9ABC");
        assert_eq!(spot.mode, "SSB");
        assert!(spot.frequency_mhz.abs() < f64::EPSILON);
    }

    #[test]
    fn drops_spot_with_bad_timestamp() {
        let mut bad = raw();
        bad.time_stamp = "soon".to_string();
        assert!(normalize_spot(&bad).is_none());
        assert_eq!(normalize_spots(&[raw(), bad]).len(), 1);
    }
}
