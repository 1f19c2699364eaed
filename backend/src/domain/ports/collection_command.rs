//! Driving port for favorites and shopping cart membership.

use async_trait::async_trait;

use crate::domain::{CollectionKind, Error, RecipeId, RecipeSummary, UserId};

/// Use-case port shared by both collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    /// Add a recipe, returning its summary.
    async fn add(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove a recipe. Removing a non-member is an invalid request.
    async fn remove(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), Error>;
}
