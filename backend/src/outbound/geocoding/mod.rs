//! Geocoding outbound adapters.
//!
//! Implements the `Geocoder` port against a Nominatim-compatible service.

mod dto;
mod nominatim;

pub use nominatim::{
    DEFAULT_GEOCODER_TIMEOUT, DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, NominatimGeocoder,
};
