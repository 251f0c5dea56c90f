#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! SOTA data source trait and spot fetching.
//!
//! The [`SotaSource`] trait abstracts the two SOTA API calls the pipelines
//! need (recent spots, single summit). [`api::SotaApi`] is the HTTP
//! implementation; tests substitute in-memory fakes.

pub mod api;
pub mod parsing;
pub mod progress;

use async_trait::async_trait;
use sota_map_spot_models::RawSpot;
use sota_map_summit_models::ApiSummit;

/// Errors that can occur while talking to the SOTA API.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered but had no record for the requested summit.
    #[error("Summit {code} not found")]
    SummitNotFound {
        /// The requested summit reference.
        code: String,
    },
}

/// How far back to look for spots.
///
/// Negative values mean "spots from the last N hours", positive values mean
/// "the N most recent spots". The value is passed to the API verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lookback(pub i32);

impl Lookback {
    /// Spots from the last hour.
    pub const DEFAULT: Self = Self(-1);

    /// Used once when the requested window returns nothing.
    pub const FALLBACK: Self = Self(10);

    /// Returns the number of hours if this is a time window.
    #[must_use]
    pub const fn hours(self) -> Option<u32> {
        if self.0 < 0 {
            Some(self.0.unsigned_abs())
        } else {
            None
        }
    }

    /// Returns the spot count if this is a count of recent spots.
    #[must_use]
    pub const fn count(self) -> Option<u32> {
        if self.0 > 0 {
            Some(self.0.unsigned_abs())
        } else {
            None
        }
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for Lookback {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access to SOTA spot and summit data.
#[async_trait]
pub trait SotaSource: Send + Sync {
    /// Fetches spots for the given lookback window. May return an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or JSON decoding fails.
    async fn fetch_spots(&self, lookback: Lookback) -> Result<Vec<RawSpot>, SourceError>;

    /// Fetches a single summit by its full reference (e.g. `"G/LD-001"`).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the summit is
    /// unknown.
    async fn fetch_summit(&self, code: &str) -> Result<ApiSummit, SourceError>;
}

/// Fetches spots, falling back once to [`Lookback::FALLBACK`] when the
/// requested window is empty.
///
/// Whatever the fallback returns is passed through, even if it is empty
/// too. Errors from either request propagate.
///
/// # Errors
///
/// Returns [`SourceError`] if either request fails.
pub async fn fetch_spots_with_fallback<S: SotaSource + ?Sized>(
    source: &S,
    lookback: Lookback,
) -> Result<Vec<RawSpot>, SourceError> {
    let spots = source.fetch_spots(lookback).await?;
    if !spots.is_empty() {
        return Ok(spots);
    }

    log::warn!(
        "No spots for lookback {lookback}, fetching the latest {} instead",
        Lookback::FALLBACK
    );
    source.fetch_spots(Lookback::FALLBACK).await
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned spot responses and records every requested lookback.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Vec<RawSpot>>>,
        requests: Mutex<Vec<Lookback>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Vec<RawSpot>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Lookback> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SotaSource for ScriptedSource {
        async fn fetch_spots(&self, lookback: Lookback) -> Result<Vec<RawSpot>, SourceError> {
            self.requests.lock().unwrap().push(lookback);
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn fetch_summit(&self, code: &str) -> Result<ApiSummit, SourceError> {
            Err(SourceError::SummitNotFound {
                code: code.to_string(),
            })
        }
    }

    fn spot(call: &str) -> RawSpot {
        RawSpot {
            activator_callsign: call.to_string(),
            ..RawSpot::default()
        }
    }

    #[tokio::test]
    async fn empty_window_triggers_exactly_one_fallback() {
        let source = ScriptedSource::new(vec![Vec::new(), vec![spot("M0ABC")]]);
        let spots = fetch_spots_with_fallback(&source, Lookback(-1)).await.unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(source.requests(), vec![Lookback(-1), Lookback(10)]);
    }

    #[tokio::test]
    async fn non_empty_window_skips_fallback() {
        let source = ScriptedSource::new(vec![vec![spot("M0ABC"), spot("SP9XYZ")]]);
        let spots = fetch_spots_with_fallback(&source, Lookback(-6)).await.unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(source.requests(), vec![Lookback(-6)]);
    }

    #[tokio::test]
    async fn empty_fallback_is_not_retried() {
        let source = ScriptedSource::new(Vec::new());
        let spots = fetch_spots_with_fallback(&source, Lookback(-1)).await.unwrap();
        assert!(spots.is_empty());
        assert_eq!(source.requests().len(), 2);
    }

    #[test]
    fn lookback_interprets_sign() {
        assert_eq!(Lookback(-3).hours(), Some(3));
        assert_eq!(Lookback(-3).count(), None);
        assert_eq!(Lookback(25).count(), Some(25));
        assert_eq!(Lookback::default(), Lookback(-1));
        assert_eq!(Lookback(0).hours(), None);
    }
}
