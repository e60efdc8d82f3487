//! Reqwest-backed Nominatim geocoder.
//!
//! Lookups are a convenience, so every transport, status or decode failure
//! is logged and reported as "no result".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{Lookup, PlaceDto};
use crate::domain::ports::Geocoder;
use crate::domain::{Coordinates, PlaceSuggestion};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/";
pub const DEFAULT_GEOCODER_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_USER_AGENT: &str = "PartFinder/1.0 (https://partfinder.app)";

const COUNTRY_CODES: &str = "in";
const SEARCH_LIMIT: &str = "8";
const REVERSE_ZOOM: &str = "10";

pub struct NominatimGeocoder {
    client: Client,
    base: Url,
}

impl NominatimGeocoder {
    /// Build a geocoder with a request timeout and identifying User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Option<Url> {
        match self.base.join(path) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(%error, path, "invalid geocoder endpoint");
                None
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Option<T> {
        let response = match self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, timeout = error.is_timeout(), "geocoder request failed");
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "geocoder answered with an error status");
            return None;
        }
        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(error) => {
                warn!(%error, "geocoder returned an unreadable body");
                None
            }
        }
    }
}

fn search_params(query: &str) -> Vec<(&'static str, String)> {
    vec![
        ("format", "json".to_owned()),
        ("q", query.to_owned()),
        ("countrycodes", COUNTRY_CODES.to_owned()),
        ("limit", SEARCH_LIMIT.to_owned()),
        ("addressdetails", "1".to_owned()),
        ("accept-language", "en".to_owned()),
    ]
}

fn reverse_params(at: Coordinates) -> Vec<(&'static str, String)> {
    vec![
        ("format", "json".to_owned()),
        ("lat", at.latitude().to_string()),
        ("lon", at.longitude().to_string()),
        ("zoom", REVERSE_ZOOM.to_owned()),
        ("addressdetails", "1".to_owned()),
        ("accept-language", "en".to_owned()),
    ]
}

/// A reverse lookup is only useful if it names a city or a state.
fn useful(place: PlaceSuggestion) -> Option<PlaceSuggestion> {
    (place.city.is_some() || place.state.is_some()).then_some(place)
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Vec<PlaceSuggestion> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let Some(url) = self.endpoint("search") else {
            return Vec::new();
        };
        let places: Vec<PlaceDto> = self
            .fetch(url, &search_params(query))
            .await
            .unwrap_or_default();
        let suggestions: Vec<_> = places
            .into_iter()
            .filter_map(|place| place.into_suggestion(Lookup::Search, None))
            .collect();
        debug!(query, results = suggestions.len(), "place search answered");
        suggestions
    }

    async fn reverse(&self, at: Coordinates) -> Option<PlaceSuggestion> {
        let url = self.endpoint("reverse")?;
        // Nominatim reports "Unable to geocode" as a 200 with an error body,
        // which decodes as a place without a name or address.
        let place: PlaceDto = self.fetch(url, &reverse_params(at)).await?;
        place
            .into_suggestion(Lookup::Reverse, Some(at))
            .and_then(useful)
    }
}
