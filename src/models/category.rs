//! Expense categories
//!
//! The category set is fixed. Categories sort and display by name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Other,
}

impl Category {
    /// All categories in form/display order
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Other,
    ];

    /// The category's display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// Next category in form order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous category in form order, wrapping around
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name matches no category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(needle.to_string()))
    }
}
