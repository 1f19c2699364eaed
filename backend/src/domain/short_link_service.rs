//! Short-link issuance and resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AssignTokenOutcome, RecipeTokenState, ShortLinkCommand, ShortLinkRepository,
    ShortLinkRepositoryError,
};
use crate::domain::{Error, RecipeId, ShortLinkToken, ShortLinkTokenSource};

/// Candidates tried before giving up on a recipe.
pub const MAX_TOKEN_ATTEMPTS: usize = 16;

fn map_repository_error(error: ShortLinkRepositoryError) -> Error {
    match error {
        ShortLinkRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("short link repository unavailable: {message}"))
        }
        ShortLinkRepositoryError::Query { message } => {
            Error::internal(format!("short link repository error: {message}"))
        }
    }
}

fn recipe_not_found(recipe: &RecipeId) -> Error {
    Error::not_found(format!("recipe {recipe} not found"))
}

/// Service implementing [`ShortLinkCommand`].
#[derive(Clone)]
pub struct ShortLinkService<R> {
    repo: Arc<R>,
    tokens: Arc<dyn ShortLinkTokenSource>,
}

impl<R> ShortLinkService<R> {
    /// Create the service over a repository and a token source.
    pub fn new(repo: Arc<R>, tokens: Arc<dyn ShortLinkTokenSource>) -> Self {
        Self { repo, tokens }
    }
}

#[async_trait]
impl<R> ShortLinkCommand for ShortLinkService<R>
where
    R: ShortLinkRepository,
{
    async fn get_or_create_token(&self, recipe: &RecipeId) -> Result<ShortLinkToken, Error> {
        match self
            .repo
            .token_state(recipe)
            .await
            .map_err(map_repository_error)?
        {
            RecipeTokenState::RecipeMissing => return Err(recipe_not_found(recipe)),
            RecipeTokenState::Assigned(token) => return Ok(token),
            RecipeTokenState::Unassigned => {}
        }

        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let candidate = self.tokens.next_token();
            if self
                .repo
                .token_exists(&candidate)
                .await
                .map_err(map_repository_error)?
            {
                debug!(attempt, "short link candidate already taken");
                continue;
            }

            match self
                .repo
                .assign(recipe, &candidate)
                .await
                .map_err(map_repository_error)?
            {
                AssignTokenOutcome::Assigned => {
                    info!(recipe_id = %recipe, token = %candidate, "short link assigned");
                    return Ok(candidate);
                }
                AssignTokenOutcome::AlreadyAssigned(token) => return Ok(token),
                AssignTokenOutcome::RecipeMissing => return Err(recipe_not_found(recipe)),
                AssignTokenOutcome::Collision => {
                    debug!(attempt, "short link candidate lost a race");
                }
            }
        }

        warn!(recipe_id = %recipe, attempts = MAX_TOKEN_ATTEMPTS, "short link generation exhausted");
        Err(Error::internal(format!(
            "could not allocate a short link after {MAX_TOKEN_ATTEMPTS} attempts"
        )))
    }

    async fn resolve(&self, token: &ShortLinkToken) -> Result<RecipeId, Error> {
        self.repo
            .resolve(token)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("short link {token} not found")))
    }
}

#[cfg(test)]
#[path = "short_link_service_tests.rs"]
mod tests;
