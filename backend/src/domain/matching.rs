//! Geographic and preference matching of vendors against a request.
//!
//! The live preview count and the authoritative fan-out both go through
//! [`scoped`], so the number a requester sees before submitting equals the
//! number of notifications created, given the same vendor population.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::geo::{fuzzy_place_match, haversine_km, normalise_place};
use super::{Coordinates, PartRequest, Profile, ProfileId, VendorPreference};

/// Geographic filter evaluated against each counterpart.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchScope {
    /// Within `km` of `origin`. Never matches without both positions.
    Radius {
        km: f64,
        origin: Option<Coordinates>,
    },
    /// Fuzzy city-name match.
    City(String),
    /// Fuzzy state-name match.
    State(String),
    /// Everyone with a known location.
    Country,
}

/// The part of a vendor profile that matching looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct Counterpart {
    pub id: ProfileId,
    pub location: Option<Coordinates>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub authorized_dealer: bool,
}

impl From<&Profile> for Counterpart {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            location: profile.location,
            city: profile.city.clone(),
            state: profile.state.clone(),
            authorized_dealer: profile.authorized_dealer,
        }
    }
}

impl SearchScope {
    /// Whether `counterpart` lies inside this scope.
    ///
    /// Counterparts without a location are outside every scope.
    pub fn contains(&self, counterpart: &Counterpart) -> bool {
        let Some(position) = counterpart.location else {
            return false;
        };
        match self {
            Self::Radius { km, origin } => origin.is_some_and(|o| haversine_km(o, position) <= *km),
            Self::City(name) => place_matches(name, counterpart.city.as_deref()),
            Self::State(name) => place_matches(name, counterpart.state.as_deref()),
            Self::Country => true,
        }
    }
}

fn place_matches(wanted: &str, actual: Option<&str>) -> bool {
    actual.is_some_and(|actual| fuzzy_place_match(wanted, actual))
}

impl VendorPreference {
    /// Whether `counterpart` satisfies the authorised-dealer filter.
    pub fn accepts(&self, counterpart: &Counterpart) -> bool {
        match self {
            Self::All => true,
            Self::Authorised => counterpart.authorized_dealer,
            Self::Local => !counterpart.authorized_dealer,
        }
    }
}

/// Scope then preference.
pub fn matches(scope: &SearchScope, preference: VendorPreference, counterpart: &Counterpart) -> bool {
    scope.contains(counterpart) && preference.accepts(counterpart)
}

/// Live counts shown while a request is being composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCounts {
    pub all: usize,
    pub authorised: usize,
    pub local: usize,
}

impl MatchCounts {
    /// The count that applies to `preference`.
    pub fn for_preference(&self, preference: VendorPreference) -> usize {
        match preference {
            VendorPreference::All => self.all,
            VendorPreference::Authorised => self.authorised,
            VendorPreference::Local => self.local,
        }
    }
}

/// Deduplicated in-scope counterparts, minus `exclude`.
fn scoped<'a>(
    scope: &'a SearchScope,
    population: &'a [Counterpart],
    exclude: Option<ProfileId>,
) -> impl Iterator<Item = &'a Counterpart> + 'a {
    let mut seen = HashSet::new();
    population.iter().filter(move |c| {
        Some(c.id) != exclude && seen.insert(c.id) && scope.contains(c)
    })
}

/// Count matches for every preference in one pass.
///
/// # Examples
/// ```
/// use partfinder::domain::{Coordinates, Counterpart, ProfileId, SearchScope, count_matches};
///
/// let origin = Coordinates::new(19.0760, 72.8777).ok();
/// let vendor = Counterpart {
///     id: ProfileId::random(),
///     location: origin,
///     city: None,
///     state: None,
///     authorized_dealer: true,
/// };
/// let counts = count_matches(&SearchScope::Radius { km: 5.0, origin }, &[vendor], None);
/// assert_eq!((counts.all, counts.authorised, counts.local), (1, 1, 0));
/// ```
pub fn count_matches(
    scope: &SearchScope,
    population: &[Counterpart],
    exclude: Option<ProfileId>,
) -> MatchCounts {
    scoped(scope, population, exclude).fold(MatchCounts::default(), |mut counts, c| {
        counts.all += 1;
        if c.authorized_dealer {
            counts.authorised += 1;
        } else {
            counts.local += 1;
        }
        counts
    })
}

/// Ids to notify, deduplicated and without `exclude`.
pub fn resolve_targets(
    scope: &SearchScope,
    preference: VendorPreference,
    population: &[Counterpart],
    exclude: Option<ProfileId>,
) -> Vec<ProfileId> {
    scoped(scope, population, exclude)
        .filter(|c| preference.accepts(c))
        .map(|c| c.id)
        .collect()
}

/// Whether a vendor's dashboard lists `request`.
///
/// A positive radius is checked first when both positions are known;
/// missing positions fall through to place matching. A request naming a
/// city or state is shown on a fuzzy match of either; a request naming
/// neither is shown to every vendor.
pub fn request_visible_to_vendor(request: &PartRequest, vendor: &Counterpart) -> bool {
    if let Some(km) = request.area.radius_km().filter(|km| *km > 0.0) {
        if let (Some(origin), Some(position)) = (request.location, vendor.location) {
            return haversine_km(origin, position) <= km;
        }
    }

    let wanted_city = request.area_city.as_deref().and_then(normalise_place);
    let wanted_state = request.area_state.as_deref().and_then(normalise_place);
    if wanted_city.is_none() && wanted_state.is_none() {
        return true;
    }

    let city_match = wanted_city.is_some_and(|city| place_matches(&city, vendor.city.as_deref()));
    let state_match =
        wanted_state.is_some_and(|state| place_matches(&state, vendor.state.as_deref()));
    city_match || state_match
}
