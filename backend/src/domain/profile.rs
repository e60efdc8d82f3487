//! Marketplace profiles: clients, vendors and administrators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Coordinates, ProfileId};

/// Fallback display name when a vendor has neither a business nor a full name.
pub const ANONYMOUS_VENDOR: &str = "A vendor";

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "vendor" => Ok(Self::Vendor),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Identity record.
///
/// Vendor-only fields (`business_name`, `category`, `companies`,
/// `authorized_dealer`) are carried for every role but only meaningful for
/// vendors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub location: Option<Coordinates>,
    pub authorized_dealer: bool,
    pub companies: Vec<String>,
}

impl Profile {
    pub fn is_vendor(&self) -> bool {
        self.role == Role::Vendor
    }

    /// Whether a usable phone number is on file.
    pub fn has_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    /// Name shown to clients when this vendor acts on their request.
    ///
    /// # Examples
    /// ```
    /// use partfinder::domain::{Profile, ProfileId, Role};
    ///
    /// let mut vendor = Profile::new(ProfileId::random(), "v@example.com", "Ravi", Role::Vendor);
    /// assert_eq!(vendor.vendor_display_name(), "Ravi");
    /// vendor.business_name = Some("Ravi Motors".into());
    /// assert_eq!(vendor.vendor_display_name(), "Ravi Motors");
    /// ```
    pub fn vendor_display_name(&self) -> &str {
        non_blank(self.business_name.as_deref())
            .or_else(|| non_blank(Some(self.full_name.as_str())))
            .unwrap_or(ANONYMOUS_VENDOR)
    }

    /// Minimal profile with every optional field empty.
    pub fn new(
        id: ProfileId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            phone: None,
            role,
            business_name: None,
            category: None,
            city: None,
            state: None,
            location: None,
            authorized_dealer: false,
            companies: Vec::new(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
