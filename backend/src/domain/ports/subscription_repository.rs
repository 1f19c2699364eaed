//! Port for follower to author subscriptions.

use async_trait::async_trait;

use crate::domain::{Subscription, SubscriptionView, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "subscription repository query failed: {message}",
        /// The unique (follower, author) constraint rejected the insert.
        Duplicate => "subscription already exists",
        /// The follower <> author check constraint rejected the insert.
        SelfSubscription => "subscription targets its own follower",
        /// The author vanished between lookup and insert.
        MissingUser => "user no longer exists",
    }
}

/// One page of subscriptions plus the total count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPage {
    /// Followed authors on this page, ordered by username.
    pub entries: Vec<SubscriptionView>,
    /// Number of followed authors across all pages.
    pub total: u64,
}

/// Port for subscription storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Load a user's public profile.
    async fn find_user(
        &self,
        id: &UserId,
    ) -> Result<Option<UserProfile>, SubscriptionRepositoryError>;

    /// Whether the pair already exists.
    async fn exists(&self, subscription: &Subscription) -> Result<bool, SubscriptionRepositoryError>;

    /// Insert the pair.
    async fn insert(&self, subscription: &Subscription) -> Result<(), SubscriptionRepositoryError>;

    /// Delete the pair, returning whether a row was removed.
    async fn remove(&self, subscription: &Subscription) -> Result<bool, SubscriptionRepositoryError>;

    /// Summarise one followed author with up to `recipes_limit` recipes.
    async fn view(
        &self,
        author: &UserProfile,
        recipes_limit: u32,
    ) -> Result<SubscriptionView, SubscriptionRepositoryError>;

    /// List authors followed by `follower`.
    async fn list(
        &self,
        follower: &UserId,
        offset: u64,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<SubscriptionPage, SubscriptionRepositoryError>;
}

/// Fixture implementation with no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionRepository;

#[async_trait]
impl SubscriptionRepository for FixtureSubscriptionRepository {
    async fn find_user(
        &self,
        _id: &UserId,
    ) -> Result<Option<UserProfile>, SubscriptionRepositoryError> {
        Ok(None)
    }

    async fn exists(
        &self,
        _subscription: &Subscription,
    ) -> Result<bool, SubscriptionRepositoryError> {
        Ok(false)
    }

    async fn insert(&self, _subscription: &Subscription) -> Result<(), SubscriptionRepositoryError> {
        Ok(())
    }

    async fn remove(
        &self,
        _subscription: &Subscription,
    ) -> Result<bool, SubscriptionRepositoryError> {
        Ok(false)
    }

    async fn view(
        &self,
        author: &UserProfile,
        _recipes_limit: u32,
    ) -> Result<SubscriptionView, SubscriptionRepositoryError> {
        Ok(SubscriptionView {
            author: author.clone(),
            recipes: Vec::new(),
            recipes_count: 0,
        })
    }

    async fn list(
        &self,
        _follower: &UserId,
        _offset: u64,
        _limit: u32,
        _recipes_limit: u32,
    ) -> Result<SubscriptionPage, SubscriptionRepositoryError> {
        Ok(SubscriptionPage::default())
    }
}
