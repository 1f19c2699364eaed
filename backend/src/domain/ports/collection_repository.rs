//! Port for favorites and shopping cart membership.
//!
//! One port serves both collections; `kind` selects the backing table.
//! Adapters must enforce uniqueness of the (user, recipe) pair with a store
//! constraint and report a lost race as [`CollectionRepositoryError::Duplicate`].

use async_trait::async_trait;

use crate::domain::{CollectionKind, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection repository adapters.
    pub enum CollectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "collection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "collection repository query failed: {message}",
        /// The unique (user, recipe) constraint rejected the insert.
        Duplicate => "collection entry already exists",
        /// The recipe vanished between lookup and insert.
        MissingRecipe => "recipe no longer exists",
        /// The member account does not exist.
        MissingUser => "user does not exist",
    }
}

/// Port for collection membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Whether the pair is already a member.
    async fn contains(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, CollectionRepositoryError>;

    /// Insert the pair.
    async fn insert(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), CollectionRepositoryError>;

    /// Delete the pair, returning whether a row was removed.
    async fn remove(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, CollectionRepositoryError>;
}

/// Fixture implementation with permanently empty collections.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionRepository;

#[async_trait]
impl CollectionRepository for FixtureCollectionRepository {
    async fn contains(
        &self,
        _kind: CollectionKind,
        _user: &UserId,
        _recipe: &RecipeId,
    ) -> Result<bool, CollectionRepositoryError> {
        Ok(false)
    }

    async fn insert(
        &self,
        _kind: CollectionKind,
        _user: &UserId,
        _recipe: &RecipeId,
    ) -> Result<(), CollectionRepositoryError> {
        Ok(())
    }

    async fn remove(
        &self,
        _kind: CollectionKind,
        _user: &UserId,
        _recipe: &RecipeId,
    ) -> Result<bool, CollectionRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(CollectionKind::Favorite)]
    #[case(CollectionKind::Cart)]
    #[tokio::test]
    async fn fixture_removal_reports_nothing_removed(#[case] kind: CollectionKind) {
        let removed = FixtureCollectionRepository
            .remove(kind, &UserId::random(), &RecipeId::random())
            .await
            .expect("fixture removal succeeds");
        assert!(!removed);
    }
}
