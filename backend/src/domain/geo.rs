//! Geographic primitives: coordinates, great-circle distance and the loose
//! place-name comparison used for city and state scopes.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Validation errors for [`Coordinates`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinatesError {
    #[error("latitude must be a finite value between -90 and 90, got {0}")]
    Latitude(f64),
    #[error("longitude must be a finite value between -180 and 180, got {0}")]
    Longitude(f64),
}

/// A validated WGS84 position.
///
/// Profiles and requests hold `Option<Coordinates>`, so a latitude without a
/// longitude cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesDto", into = "CoordinatesDto")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and construct a position.
    ///
    /// # Examples
    /// ```
    /// use partfinder::domain::Coordinates;
    ///
    /// assert!(Coordinates::new(19.076, 72.8777).is_ok());
    /// assert!(Coordinates::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a position from the nullable column pair used in storage.
    ///
    /// Returns `None` when either half is missing or out of range.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).ok(),
            _ => None,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CoordinatesDto {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinates> for CoordinatesDto {
    fn from(value: Coordinates) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl TryFrom<CoordinatesDto> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(value: CoordinatesDto) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

/// Great-circle distance between two positions in kilometres.
///
/// # Examples
/// ```
/// use partfinder::domain::{Coordinates, haversine_km};
///
/// let mumbai = Coordinates::new(19.0760, 72.8777).expect("valid");
/// let pune = Coordinates::new(18.5204, 73.8567).expect("valid");
/// let km = haversine_km(mumbai, pune);
/// assert!((115.0..125.0).contains(&km));
/// ```
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Lowercase and trim a place name; blank names normalise to `None`.
pub fn normalise_place(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Containment match in either direction after normalisation.
///
/// Deliberately loose so "Mumbai" matches "Greater Mumbai"; "Pune" also
/// matches "Punekar Colony". Blank names never match.
pub fn fuzzy_place_match(a: &str, b: &str) -> bool {
    match (normalise_place(a), normalise_place(b)) {
        (Some(a), Some(b)) => a.contains(&b) || b.contains(&a),
        _ => false,
    }
}
