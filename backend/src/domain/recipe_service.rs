//! Recipe mutation and query service.
//!
//! Every draft is validated and every referenced tag and ingredient is
//! checked before the repository is asked to write, so a rejected request
//! never leaves partial state behind. Ownership is enforced here: only the
//! author may replace or delete a recipe.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    NewRecipe, RecipeCommand, RecipeListRequest, RecipeQuery, RecipeRepository,
    RecipeRepositoryError, RecipeUpdate,
};
use crate::domain::{
    DraftPurpose, Error, Paged, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeValidationError,
    RecipeView, UserId, ValidatedRecipe,
};

fn map_repository_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipeRepositoryError::MissingReference { message } => {
            Error::not_found(format!("referenced data no longer exists: {message}"))
        }
    }
}

fn map_validation_error(error: &RecipeValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

fn recipe_not_found(id: &RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Recipe service implementing [`RecipeCommand`] and [`RecipeQuery`].
#[derive(Clone)]
pub struct RecipeService<R> {
    recipes: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RecipeService<R> {
    /// Create the service over a recipe repository and a clock used for
    /// creation timestamps.
    pub fn new(recipes: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { recipes, clock }
    }
}

impl<R> RecipeService<R>
where
    R: RecipeRepository,
{
    async fn ensure_references_exist(&self, content: &ValidatedRecipe) -> Result<(), Error> {
        let missing_tags = self
            .recipes
            .missing_tags(content.tags())
            .await
            .map_err(map_repository_error)?;
        if !missing_tags.is_empty() {
            return Err(
                Error::not_found(format!("unknown tags: {}", join_ids(&missing_tags)))
                    .with_details(json!({"field": "tags", "code": "unknown_tag"})),
            );
        }

        let missing_ingredients = self
            .recipes
            .missing_ingredients(&content.ingredient_ids())
            .await
            .map_err(map_repository_error)?;
        if !missing_ingredients.is_empty() {
            return Err(Error::not_found(format!(
                "unknown ingredients: {}",
                join_ids(&missing_ingredients)
            ))
            .with_details(json!({"field": "ingredients", "code": "unknown_ingredient"})));
        }
        Ok(())
    }

    async fn owned_recipe(&self, actor: &UserId, id: &RecipeId) -> Result<Recipe, Error> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        if !recipe.is_owned_by(actor) {
            debug!(recipe_id = %id, actor = %actor, "rejected mutation by non-author");
            return Err(Error::forbidden("only the author can modify this recipe"));
        }
        Ok(recipe)
    }

    async fn load_view(&self, id: &RecipeId, viewer: Option<UserId>) -> Result<RecipeView, Error> {
        self.recipes
            .find_view(id, viewer)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| recipe_not_found(id))
    }
}

#[async_trait]
impl<R> RecipeCommand for RecipeService<R>
where
    R: RecipeRepository,
{
    async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        let content = draft
            .validate(DraftPurpose::Create)
            .map_err(|err| map_validation_error(&err))?;
        self.ensure_references_exist(&content).await?;

        let recipe = NewRecipe {
            id: RecipeId::random(),
            author: *author,
            created_at: self.clock.utc(),
            content,
        };
        self.recipes
            .create(&recipe)
            .await
            .map_err(map_repository_error)?;
        info!(recipe_id = %recipe.id, author = %author, "recipe created");

        self.load_view(&recipe.id, Some(*author)).await
    }

    async fn update(
        &self,
        actor: &UserId,
        recipe: &RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        self.owned_recipe(actor, recipe).await?;
        let content = draft
            .validate(DraftPurpose::Update)
            .map_err(|err| map_validation_error(&err))?;
        self.ensure_references_exist(&content).await?;

        let updated = self
            .recipes
            .update(&RecipeUpdate {
                id: *recipe,
                content,
            })
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(recipe_not_found(recipe));
        }
        info!(recipe_id = %recipe, "recipe updated");

        self.load_view(recipe, Some(*actor)).await
    }

    async fn delete(&self, actor: &UserId, recipe: &RecipeId) -> Result<(), Error> {
        self.owned_recipe(actor, recipe).await?;
        let deleted = self
            .recipes
            .delete(recipe)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(recipe_not_found(recipe));
        }
        info!(recipe_id = %recipe, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> RecipeQuery for RecipeService<R>
where
    R: RecipeRepository,
{
    async fn get(&self, recipe: &RecipeId, viewer: Option<UserId>) -> Result<RecipeView, Error> {
        self.load_view(recipe, viewer).await
    }

    async fn list(
        &self,
        request: &RecipeListRequest,
        viewer: Option<UserId>,
    ) -> Result<Paged<RecipeView>, Error> {
        let wants_personal = request.only_favorited || request.only_in_cart;
        if wants_personal && viewer.is_none() {
            // Anonymous users have no favorites and no cart.
            return Ok(Paged::empty());
        }

        let filter = RecipeFilter {
            author: request.author,
            tag_slugs: request.tag_slugs.clone(),
            favorited_by: viewer.filter(|_| request.only_favorited),
            in_cart_of: viewer.filter(|_| request.only_in_cart),
        };
        let page = self
            .recipes
            .list(
                &filter,
                request.page.offset(),
                request.page.limit(),
                viewer,
            )
            .await
            .map_err(map_repository_error)?;

        Ok(Paged {
            items: page.recipes,
            total: page.total,
        })
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
