//! Listing (product) domain types.

use serde::{Deserialize, Serialize};

/// Visibility of a listing. Suspended listings are hidden from the public catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Active,
    Suspended,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// Maximum listing title length in characters.
pub const MAX_TITLE_LEN: usize = 120;

/// Maximum listing description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Title must be non-blank and at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> bool {
    !title.trim().is_empty() && title.chars().count() <= MAX_TITLE_LEN
}

pub fn validate_description(description: &str) -> bool {
    description.chars().count() <= MAX_DESCRIPTION_LEN
}
