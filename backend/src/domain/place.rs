//! Place suggestions returned by geocoding lookups.

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// A candidate location offered to the user while filling in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub display_name: String,
    pub location: Coordinates,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Split a comma-separated display name into `(city, state)`.
///
/// Used when a geocoder returns no structured address. Display names read
/// from most to least specific and end in the country, so the state is the
/// second-to-last component and the city the one before it. Short names
/// shift one place to the right.
///
/// # Examples
/// ```
/// use partfinder::domain::split_display_name;
///
/// let (city, state) = split_display_name("Andheri, Mumbai, Maharashtra, India");
/// assert_eq!(city.as_deref(), Some("Mumbai"));
/// assert_eq!(state.as_deref(), Some("Maharashtra"));
/// ```
pub fn split_display_name(display_name: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = display_name
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    let n = parts.len();
    let pick = |from_end: usize| n.checked_sub(from_end).and_then(|i| parts.get(i));
    let city = if n >= 3 { pick(3) } else { pick(2) };
    let state = if n >= 2 { pick(2) } else { pick(1) };
    (
        city.map(|c| (*c).to_owned()),
        state.map(|s| (*s).to_owned()),
    )
}
