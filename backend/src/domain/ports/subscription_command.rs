//! Driving port for subscriptions.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Paged, SubscriptionView, UserId};

/// Use-case port for following authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionCommand: Send + Sync {
    /// Follow `author`, returning their summary.
    async fn subscribe(
        &self,
        follower: &UserId,
        author: &UserId,
        recipes_limit: u32,
    ) -> Result<SubscriptionView, Error>;

    /// Stop following `author`. Unfollowing a non-followed author is an
    /// invalid request.
    async fn unsubscribe(&self, follower: &UserId, author: &UserId) -> Result<(), Error>;

    /// Authors followed by `follower`.
    async fn list(
        &self,
        follower: &UserId,
        page: PageRequest,
        recipes_limit: u32,
    ) -> Result<Paged<SubscriptionView>, Error>;
}
