//! Subscription management.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{
    SubscriptionCommand, SubscriptionRepository, SubscriptionRepositoryError,
};
use crate::domain::{Error, Paged, Subscription, SubscriptionView, UserId, UserProfile};

const ALREADY_SUBSCRIBED: &str = "already subscribed";
const NOT_SUBSCRIBED: &str = "not subscribed";
const SELF_SUBSCRIPTION: &str = "cannot subscribe to yourself";

fn map_repository_error(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
        SubscriptionRepositoryError::Duplicate => Error::conflict(ALREADY_SUBSCRIBED),
        SubscriptionRepositoryError::SelfSubscription => Error::conflict(SELF_SUBSCRIPTION),
        SubscriptionRepositoryError::MissingUser => Error::not_found("user not found"),
    }
}

/// Service implementing [`SubscriptionCommand`].
#[derive(Clone)]
pub struct SubscriptionService<R> {
    repo: Arc<R>,
}

impl<R> SubscriptionService<R> {
    /// Create the service over a subscription repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> SubscriptionService<R>
where
    R: SubscriptionRepository,
{
    async fn existing_user(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.repo
            .find_user(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[async_trait]
impl<R> SubscriptionCommand for SubscriptionService<R>
where
    R: SubscriptionRepository,
{
    async fn subscribe(
        &self,
        follower: &UserId,
        author: &UserId,
        recipes_limit: u32,
    ) -> Result<SubscriptionView, Error> {
        let subscription =
            Subscription::new(*follower, *author).map_err(|err| Error::conflict(err.to_string()))?;
        let profile = self.existing_user(author).await?;

        if self
            .repo
            .exists(&subscription)
            .await
            .map_err(map_repository_error)?
        {
            return Err(Error::conflict(ALREADY_SUBSCRIBED));
        }
        self.repo
            .insert(&subscription)
            .await
            .map_err(map_repository_error)?;
        info!(follower = %follower, author = %author, "subscription created");

        self.repo
            .view(&profile, recipes_limit)
            .await
            .map_err(map_repository_error)
    }

    async fn unsubscribe(&self, follower: &UserId, author: &UserId) -> Result<(), Error> {
        self.existing_user(author).await?;
        let Ok(subscription) = Subscription::new(*follower, *author) else {
            return Err(Error::invalid_request(NOT_SUBSCRIBED));
        };

        let removed = self
            .repo
            .remove(&subscription)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::invalid_request(NOT_SUBSCRIBED));
        }
        info!(follower = %follower, author = %author, "subscription removed");
        Ok(())
    }

    async fn list(
        &self,
        follower: &UserId,
        page: PageRequest,
        recipes_limit: u32,
    ) -> Result<Paged<SubscriptionView>, Error> {
        let found = self
            .repo
            .list(follower, page.offset(), page.limit(), recipes_limit)
            .await
            .map_err(map_repository_error)?;
        Ok(Paged {
            items: found.entries,
            total: found.total,
        })
    }
}

#[cfg(test)]
#[path = "subscription_service_tests.rs"]
mod tests;
