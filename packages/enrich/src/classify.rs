//! Band and mode classification.

use sota_map_spot_models::{BandRange, Mode, band_for_frequency};

/// Band and mode assigned to a spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// First band whose bounds contain the frequency.
    pub band: Option<&'static BandRange>,
    /// Case-insensitive match in the mode table.
    pub mode: Option<Mode>,
}

/// Classifies a frequency (MHz) and free-text mode.
#[must_use]
pub fn classify(frequency_mhz: f64, mode: &str) -> Classification {
    Classification {
        band: band_for_frequency(frequency_mhz),
        mode: Mode::from_spot_mode(mode),
    }
}
