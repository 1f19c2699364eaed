//! PostgreSQL-backed `ShortLinkRepository` implementation.
//!
//! Tokens live in the nullable, unique `recipes.short_link` column. An
//! assignment only writes when the column is still empty, so concurrent
//! requests for the same recipe converge on one token.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    AssignTokenOutcome, RecipeTokenState, ShortLinkRepository, ShortLinkRepositoryError,
};
use crate::domain::{RecipeId, ShortLinkToken};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::recipes;

/// Diesel-backed implementation of the short-link repository port.
#[derive(Clone)]
pub struct DieselShortLinkRepository {
    pool: DbPool,
}

impl DieselShortLinkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShortLinkRepositoryError {
    map_basic_pool_error(error, ShortLinkRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShortLinkRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ShortLinkRepositoryError::connection(message),
        StoreFailure::Query(message)
        | StoreFailure::UniqueViolation(message)
        | StoreFailure::CheckViolation(message)
        | StoreFailure::ForeignKeyViolation(message) => ShortLinkRepositoryError::query(message),
    }
}

fn decode_state(stored: Option<Option<String>>) -> Result<RecipeTokenState, ShortLinkRepositoryError> {
    match stored {
        None => Ok(RecipeTokenState::RecipeMissing),
        Some(None) => Ok(RecipeTokenState::Unassigned),
        Some(Some(raw)) => ShortLinkToken::new(raw)
            .map(RecipeTokenState::Assigned)
            .map_err(|err| ShortLinkRepositoryError::query(format!("stored short link: {err}"))),
    }
}

impl DieselShortLinkRepository {
    async fn load_state(&self, recipe: Uuid) -> Result<RecipeTokenState, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<Option<String>> = recipes::table
            .find(recipe)
            .select(recipes::short_link)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        decode_state(stored)
    }
}

#[async_trait]
impl ShortLinkRepository for DieselShortLinkRepository {
    async fn token_state(
        &self,
        recipe: &RecipeId,
    ) -> Result<RecipeTokenState, ShortLinkRepositoryError> {
        self.load_state(*recipe.as_uuid()).await
    }

    async fn token_exists(&self, token: &ShortLinkToken) -> Result<bool, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            recipes::table.filter(recipes::short_link.eq(token.as_str())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn assign(
        &self,
        recipe: &RecipeId,
        token: &ShortLinkToken,
    ) -> Result<AssignTokenOutcome, ShortLinkRepositoryError> {
        let recipe_id = *recipe.as_uuid();
        let written = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::update(
                recipes::table
                    .filter(recipes::id.eq(recipe_id))
                    .filter(recipes::short_link.is_null()),
            )
            .set(recipes::short_link.eq(token.as_str()))
            .execute(&mut conn)
            .await
        };

        match written {
            Ok(0) => match self.load_state(recipe_id).await? {
                RecipeTokenState::RecipeMissing => Ok(AssignTokenOutcome::RecipeMissing),
                RecipeTokenState::Assigned(existing) => {
                    Ok(AssignTokenOutcome::AlreadyAssigned(existing))
                }
                RecipeTokenState::Unassigned => {
                    warn!(recipe_id = %recipe, "short link update matched no row");
                    Err(ShortLinkRepositoryError::query("short link assignment lost"))
                }
            },
            Ok(_) => Ok(AssignTokenOutcome::Assigned),
            Err(error) => match classify_diesel_error(error) {
                StoreFailure::UniqueViolation(_) => Ok(AssignTokenOutcome::Collision),
                StoreFailure::Connection(message) => {
                    Err(ShortLinkRepositoryError::connection(message))
                }
                StoreFailure::Query(message)
                | StoreFailure::CheckViolation(message)
                | StoreFailure::ForeignKeyViolation(message) => {
                    Err(ShortLinkRepositoryError::query(message))
                }
            },
        }
    }

    async fn resolve(
        &self,
        token: &ShortLinkToken,
    ) -> Result<Option<RecipeId>, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<Uuid> = recipes::table
            .filter(recipes::short_link.eq(token.as_str()))
            .select(recipes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.map(RecipeId::from_uuid))
    }
}
