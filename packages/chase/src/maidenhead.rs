//! Maidenhead locator to coordinates.

/// Errors that can occur while converting a Maidenhead locator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    /// Locator length is not 2, 4, 6, or 8.
    #[error("Locator {0:?} must have 2, 4, 6 or 8 characters")]
    Length(String),

    /// A character is outside the range allowed at its position.
    #[error("Locator {locator:?} has an invalid character at position {position}")]
    Character {
        /// The locator as given.
        locator: String,
        /// Zero-based character position.
        position: usize,
    },
}

/// Converts a locator to the `(latitude, longitude)` of its south-west
/// corner.
///
/// # Errors
///
/// Returns [`LocatorError`] for malformed locators.
pub fn to_location(locator: &str) -> Result<(f64, f64), LocatorError> {
    let chars: Vec<char> = locator.trim().chars().collect();
    if chars.is_empty() || chars.len() > 8 || chars.len() % 2 != 0 {
        return Err(LocatorError::Length(locator.to_string()));
    }

    let digit = |position: usize, base: char, max: u32| -> Result<f64, LocatorError> {
        let c = chars[position].to_ascii_uppercase();
        let value = (c as u32).wrapping_sub(base as u32);
        if value < max {
            Ok(f64::from(value))
        } else {
            Err(LocatorError::Character {
                locator: locator.to_string(),
                position,
            })
        }
    };

    // Field: 18 x 18, 20 by 10 degrees.
    let mut lon = digit(0, 'A', 18)?.mul_add(20.0, -180.0);
    let mut lat = digit(1, 'A', 18)?.mul_add(10.0, -90.0);

    if chars.len() >= 4 {
        lon += digit(2, '0', 10)? * 2.0;
        lat += digit(3, '0', 10)?;
    }
    if chars.len() >= 6 {
        lon += digit(4, 'A', 24)? * 5.0 / 60.0;
        lat += digit(5, 'A', 24)? * 2.5 / 60.0;
    }
    if chars.len() == 8 {
        lon += digit(6, '0', 10)? * 0.5 / 60.0;
        lat += digit(7, '0', 10)? * 0.25 / 60.0;
    }

    Ok((lat, lon))
}
