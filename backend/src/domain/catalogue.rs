//! Fixed two-level part taxonomy.
//!
//! Requests persist only the leaf category; the main category is derived
//! from the taxonomy when needed.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Main categories and their leaves, in display order.
pub const PART_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "Automobile",
        &[
            "Engine Parts",
            "Transmission",
            "Brakes",
            "Suspension",
            "Electrical",
            "Body Parts",
            "Tyres & Wheels",
            "Exhaust",
            "Cooling",
            "Fuel System",
            "AC & Heating",
            "Filters & Fluids",
            "Batteries",
            "Accessories",
        ],
    ),
    (
        "Electronics",
        &[
            "Car Electronics",
            "Dashboard & Infotainment",
            "Audio Systems",
            "Lighting",
        ],
    ),
    (
        "Lubricants & Fluids",
        &["Engine Oil", "Coolant", "Transmission Fluid", "Brake Fluid"],
    ),
];

const DEFAULT_MAIN: &str = "Automobile";
const DEFAULT_LEAF: &str = "Engine Parts";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown part category: {0}")]
pub struct UnknownCategory(pub String);

/// A leaf category from [`PART_TAXONOMY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct PartCategory {
    main: &'static str,
    leaf: &'static str,
}

impl PartCategory {
    /// Look up a leaf category by name (exact match, surrounding whitespace ignored).
    ///
    /// # Examples
    /// ```
    /// use partfinder::domain::PartCategory;
    ///
    /// let brakes = PartCategory::parse("Brakes").expect("known leaf");
    /// assert_eq!(brakes.main(), "Automobile");
    /// assert!(PartCategory::parse("Furniture").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, UnknownCategory> {
        let wanted = name.trim();
        PART_TAXONOMY
            .iter()
            .find_map(|(main, leaves)| {
                leaves
                    .iter()
                    .find(|leaf| **leaf == wanted)
                    .map(|leaf| Self { main, leaf })
            })
            .ok_or_else(|| UnknownCategory(name.to_owned()))
    }

    pub fn main(&self) -> &'static str {
        self.main
    }

    pub fn leaf(&self) -> &'static str {
        self.leaf
    }
}

impl Default for PartCategory {
    fn default() -> Self {
        Self {
            main: DEFAULT_MAIN,
            leaf: DEFAULT_LEAF,
        }
    }
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.leaf)
    }
}

impl TryFrom<String> for PartCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<'de> Deserialize<'de> for PartCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}

impl From<PartCategory> for String {
    fn from(value: PartCategory) -> Self {
        value.leaf.to_owned()
    }
}
