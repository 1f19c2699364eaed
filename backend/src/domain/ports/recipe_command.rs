//! Driving port for recipe mutations.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipeView, UserId};

/// Use-case port for creating, replacing and deleting recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Validate and store a new recipe owned by `author`.
    async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Replace a recipe's fields, tags and ingredients. Only the author may
    /// do this.
    async fn update(
        &self,
        actor: &UserId,
        recipe: &RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe. Only the author may do this.
    async fn delete(&self, actor: &UserId, recipe: &RecipeId) -> Result<(), Error>;
}
