//! DTOs for decoding Nominatim JSON.
//!
//! Nominatim sends coordinates as strings and fills whichever address keys
//! suit the place, so decoding is lenient and mapping picks the first
//! populated key.

use serde::Deserialize;

use crate::domain::{Coordinates, PlaceSuggestion, split_display_name};

#[derive(Debug, Deserialize)]
pub(super) struct PlaceDto {
    #[serde(default)]
    pub(super) display_name: String,
    pub(super) lat: Option<String>,
    pub(super) lon: Option<String>,
    pub(super) address: Option<AddressDto>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AddressDto {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    hamlet: Option<String>,
    suburb: Option<String>,
    state: Option<String>,
    province: Option<String>,
    region: Option<String>,
}

/// Which lookup produced the result; reverse lookups accept a few more keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Lookup {
    Search,
    Reverse,
}

fn first(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

impl AddressDto {
    fn city(&self, lookup: Lookup) -> Option<String> {
        let mut keys = vec![&self.city, &self.town, &self.village, &self.county, &self.hamlet];
        if lookup == Lookup::Reverse {
            keys.push(&self.suburb);
        }
        first(&keys)
    }

    fn state(&self, lookup: Lookup) -> Option<String> {
        let mut keys = vec![&self.state, &self.province];
        if lookup == Lookup::Reverse {
            keys.push(&self.region);
        }
        first(&keys)
    }
}

impl PlaceDto {
    fn coordinates(&self) -> Option<Coordinates> {
        let lat = self.lat.as_deref()?.trim().parse().ok()?;
        let lon = self.lon.as_deref()?.trim().parse().ok()?;
        Coordinates::new(lat, lon).ok()
    }

    /// Map to a suggestion, using `fallback` when the body has no position.
    ///
    /// Returns `None` when there is no usable position at all.
    pub(super) fn into_suggestion(
        self,
        lookup: Lookup,
        fallback: Option<Coordinates>,
    ) -> Option<PlaceSuggestion> {
        let location = self.coordinates().or(fallback)?;
        let (city, state) = match &self.address {
            Some(address) => (address.city(lookup), address.state(lookup)),
            None => split_display_name(&self.display_name),
        };
        Some(PlaceSuggestion {
            display_name: self.display_name,
            location,
            city,
            state,
        })
    }
}
