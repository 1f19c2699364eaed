//! Per-user recipe collections.
//!
//! Favorites and the shopping cart are structurally identical sets of
//! recipes; [`CollectionKind`] selects which one an operation targets.

use serde::{Deserialize, Serialize};

/// Which per-user recipe set an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Recipes the user marked as favorites.
    Favorite,
    /// Recipes whose ingredients go on the user's shopping list.
    Cart,
}

impl CollectionKind {
    /// Stable identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::Cart => "shopping_cart",
        }
    }

    /// Human-readable collection name used in client-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::Cart => "the shopping cart",
        }
    }

    /// Message returned when the pair is already a member.
    #[must_use]
    pub fn already_member_message(self) -> String {
        format!("recipe is already in {}", self.label())
    }

    /// Message returned when removing a pair that is not a member.
    #[must_use]
    pub fn not_member_message(self) -> String {
        format!("recipe is not in {}", self.label())
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
