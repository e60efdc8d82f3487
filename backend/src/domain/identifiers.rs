//! Strongly typed identifiers for marketplace entities.
//!
//! Every row in the marketplace is keyed by a UUID. Wrapping each key in its
//! own type keeps a request id from being passed where a profile id is
//! expected, which matters because notification rows carry several ids side
//! by side.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing identifiers from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The input was empty.
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
    /// The input was not a UUID.
    #[error("{kind} must be a valid UUID")]
    Invalid { kind: &'static str },
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its textual UUID form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdentifierError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdentifierError::Empty { kind: $kind });
                }
                if raw.trim() != raw {
                    return Err(IdentifierError::Invalid { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdentifierError::Invalid { kind: $kind })
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_identifier!(
    /// Identity key shared by a profile and its auth account.
    ProfileId,
    "profile id"
);
define_identifier!(
    /// Identifier of a part request.
    RequestId,
    "request id"
);
define_identifier!(
    /// Identifier of a vendor's response to a request.
    ResponseId,
    "response id"
);
define_identifier!(
    /// Identifier of a fan-out notification row.
    NotificationId,
    "notification id"
);
