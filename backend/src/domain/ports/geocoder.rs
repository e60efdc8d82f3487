//! Port for forward and reverse place lookups.
//!
//! Geocoding is a convenience for filling in forms. Adapters swallow
//! timeouts, bad statuses and malformed bodies and report "no result", so
//! the trait has no error type.

use async_trait::async_trait;

use crate::domain::{Coordinates, PlaceSuggestion};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidate places for free text. Blank queries yield nothing.
    async fn search(&self, query: &str) -> Vec<PlaceSuggestion>;

    /// Best-known place at a position, if it has a city or state.
    async fn reverse(&self, at: Coordinates) -> Option<PlaceSuggestion>;
}

/// Geocoder that never knows anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGeocoder;

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn search(&self, _query: &str) -> Vec<PlaceSuggestion> {
        Vec::new()
    }

    async fn reverse(&self, _at: Coordinates) -> Option<PlaceSuggestion> {
        None
    }
}
