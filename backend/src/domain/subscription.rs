//! Follower to author subscriptions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{RecipeSummary, UserId, UserProfile};

/// Default number of recipes previewed per subscribed author.
pub const DEFAULT_RECIPES_LIMIT: u32 = 3;

/// A user following another user's recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    follower: UserId,
    author: UserId,
}

/// Rejected subscription pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// Follower and author are the same user.
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
}

impl Subscription {
    /// Build a subscription, rejecting self-subscription.
    ///
    /// # Errors
    /// Returns [`SubscriptionError::SelfSubscription`] when both ids match.
    pub fn new(follower: UserId, author: UserId) -> Result<Self, SubscriptionError> {
        if follower == author {
            return Err(SubscriptionError::SelfSubscription);
        }
        Ok(Self { follower, author })
    }

    /// Subscribing user.
    #[must_use]
    pub const fn follower(&self) -> UserId {
        self.follower
    }

    /// Followed user.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }
}

/// A followed author with a preview of their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionView {
    /// Followed author.
    pub author: UserProfile,
    /// Newest recipes, at most the requested preview size.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes the author has published.
    pub recipes_count: u64,
}
