//! Port for recipe persistence.
//!
//! Writes are atomic: an adapter must apply the recipe row, its tag links and
//! its ingredient lines together or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    IngredientId, Recipe, RecipeFilter, RecipeId, RecipeView, TagId, UserId, ValidatedRecipe,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "recipe repository query failed: {message}",
        /// A foreign key rejected the write, typically because a referenced
        /// ingredient, tag or author disappeared mid-request.
        MissingReference { message: String } =>
            "recipe references missing data: {message}",
    }
}

/// Recipe ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    /// Identifier assigned by the service.
    pub id: RecipeId,
    /// Owning user.
    pub author: UserId,
    /// Creation timestamp from the service clock.
    pub created_at: DateTime<Utc>,
    /// Validated content; the image is always present.
    pub content: ValidatedRecipe,
}

/// Replacement content for an existing recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeUpdate {
    /// Recipe to replace.
    pub id: RecipeId,
    /// New content. A missing image keeps the stored one.
    pub content: ValidatedRecipe,
}

/// One page of listed recipes plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePage {
    /// Recipes on the page, newest first.
    pub recipes: Vec<RecipeView>,
    /// Number of recipes matching the filter across all pages.
    pub total: u64,
}

/// Port for reading and writing recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Return the subset of `ids` with no matching ingredient row.
    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, RecipeRepositoryError>;

    /// Return the subset of `ids` with no matching tag row.
    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, RecipeRepositoryError>;

    /// Insert a recipe with its tags and ingredient lines in one transaction.
    ///
    /// Ingredient lines are written in one batch ordered by ingredient name.
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RecipeRepositoryError>;

    /// Replace the scalar fields and both association sets in one
    /// transaction. Returns `false` when the recipe does not exist.
    async fn update(&self, update: &RecipeUpdate) -> Result<bool, RecipeRepositoryError>;

    /// Delete a recipe; associations cascade. Returns whether a row was
    /// removed.
    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Load a recipe with its associations.
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Load a recipe decorated with the viewer's favorite and cart flags.
    async fn find_view(
        &self,
        id: &RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, RecipeRepositoryError>;

    /// List recipes matching `filter`, newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        offset: u64,
        limit: u32,
        viewer: Option<UserId>,
    ) -> Result<RecipePage, RecipeRepositoryError>;
}

/// Fixture implementation for running without a database.
///
/// Reports every reference as missing so writes are rejected cleanly.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeRepository;

#[async_trait]
impl RecipeRepository for FixtureRecipeRepository {
    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, RecipeRepositoryError> {
        Ok(ids.to_vec())
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, RecipeRepositoryError> {
        Ok(ids.to_vec())
    }

    async fn create(&self, _recipe: &NewRecipe) -> Result<(), RecipeRepositoryError> {
        Ok(())
    }

    async fn update(&self, _update: &RecipeUpdate) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn find_view(
        &self,
        _id: &RecipeId,
        _viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn list(
        &self,
        _filter: &RecipeFilter,
        _offset: u64,
        _limit: u32,
        _viewer: Option<UserId>,
    ) -> Result<RecipePage, RecipeRepositoryError> {
        Ok(RecipePage::default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_every_reference_missing() {
        let repo = FixtureRecipeRepository;
        let missing = repo
            .missing_tags(&[TagId(1), TagId(2)])
            .await
            .expect("fixture lookup succeeds");
        assert_eq!(missing, vec![TagId(1), TagId(2)]);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_list_is_empty() {
        let page = FixtureRecipeRepository
            .list(&RecipeFilter::default(), 0, 6, None)
            .await
            .expect("fixture list succeeds");
        assert_eq!(page, RecipePage::default());
    }

    #[rstest]
    fn missing_reference_formats_message() {
        let err = RecipeRepositoryError::missing_reference("ingredient 9");
        assert!(err.to_string().contains("ingredient 9"));
    }
}
