//! Book category — the enumerated download variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown book category: {0}")]
pub struct ParseCategoryError(pub String);

/// The fixed set of book variants a visitor can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookCategory {
    Publishers,
    Agents,
    Therapists,
}

impl BookCategory {
    pub const ALL: [BookCategory; 3] = [
        BookCategory::Publishers,
        BookCategory::Agents,
        BookCategory::Therapists,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::Publishers => "publishers",
            BookCategory::Agents => "agents",
            BookCategory::Therapists => "therapists",
        }
    }
}

impl FromStr for BookCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publishers" => Ok(BookCategory::Publishers),
            "agents" => Ok(BookCategory::Agents),
            "therapists" => Ok(BookCategory::Therapists),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
