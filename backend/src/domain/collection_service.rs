//! Favorites and shopping cart membership service.
//!
//! Both collections share this implementation; [`CollectionKind`] picks the
//! target set and the client-facing wording. The store's unique constraint
//! decides the outcome of concurrent adds; the membership check before the
//! insert only saves a round trip in the common case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    CollectionCommand, CollectionRepository, CollectionRepositoryError, RecipeRepository,
    RecipeRepositoryError,
};
use crate::domain::{CollectionKind, Error, RecipeId, RecipeSummary, UserId};

fn map_collection_error(kind: CollectionKind, recipe: &RecipeId, error: CollectionRepositoryError) -> Error {
    match error {
        CollectionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("collection repository unavailable: {message}"))
        }
        CollectionRepositoryError::Query { message } => {
            Error::internal(format!("collection repository error: {message}"))
        }
        CollectionRepositoryError::Duplicate => Error::conflict(kind.already_member_message()),
        CollectionRepositoryError::MissingRecipe => {
            Error::not_found(format!("recipe {recipe} not found"))
        }
        CollectionRepositoryError::MissingUser => {
            Error::unauthorized("session user is not a known account")
        }
    }
}

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message }
        | RecipeRepositoryError::MissingReference { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

/// Collection service implementing [`CollectionCommand`].
#[derive(Clone)]
pub struct CollectionService<C, R> {
    collections: Arc<C>,
    recipes: Arc<R>,
}

impl<C, R> CollectionService<C, R> {
    /// Create the service over the collection and recipe repositories.
    pub fn new(collections: Arc<C>, recipes: Arc<R>) -> Self {
        Self {
            collections,
            recipes,
        }
    }
}

#[async_trait]
impl<C, R> CollectionCommand for CollectionService<C, R>
where
    C: CollectionRepository,
    R: RecipeRepository,
{
    async fn add(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let stored = self
            .recipes
            .find_by_id(recipe)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(format!("recipe {recipe} not found")))?;

        let present = self
            .collections
            .contains(kind, user, recipe)
            .await
            .map_err(|err| map_collection_error(kind, recipe, err))?;
        if present {
            debug!(collection = %kind, recipe_id = %recipe, "recipe already collected");
            return Err(Error::conflict(kind.already_member_message()));
        }

        self.collections
            .insert(kind, user, recipe)
            .await
            .map_err(|err| map_collection_error(kind, recipe, err))?;
        info!(collection = %kind, recipe_id = %recipe, user = %user, "recipe collected");

        Ok(RecipeSummary::from(&stored))
    }

    async fn remove(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), Error> {
        self.recipes
            .find_by_id(recipe)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(format!("recipe {recipe} not found")))?;

        let removed = self
            .collections
            .remove(kind, user, recipe)
            .await
            .map_err(|err| map_collection_error(kind, recipe, err))?;
        if !removed {
            return Err(Error::invalid_request(kind.not_member_message()));
        }
        info!(collection = %kind, recipe_id = %recipe, user = %user, "recipe released");
        Ok(())
    }
}

#[cfg(test)]
#[path = "collection_service_tests.rs"]
mod tests;
