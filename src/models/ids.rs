//! Strongly-typed ID wrappers
//!
//! Identifiers are opaque tokens. Nothing in the crate relies on their
//! ordering; they are only compared for equality and displayed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Prefix used when displaying the short form
            pub const PREFIX: &'static str = $display_prefix;

            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Full hyphenated form, suitable for exports
            pub fn to_full_string(&self) -> String {
                self.0.to_string()
            }

            /// Whether `prefix` (with or without the display prefix) addresses this ID
            pub fn matches_prefix(&self, prefix: &str) -> bool {
                let prefix = prefix.strip_prefix($display_prefix).unwrap_or(prefix);
                !prefix.is_empty() && self.0.to_string().starts_with(&prefix.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ExpenseId, "exp-");
