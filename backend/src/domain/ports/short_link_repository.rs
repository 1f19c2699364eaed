//! Port for short-link token storage.
//!
//! The token column carries a unique constraint. Adapters report a candidate
//! rejected by that constraint as [`AssignTokenOutcome::Collision`] rather
//! than an error so the caller can retry with a new candidate.

use async_trait::async_trait;

use crate::domain::{RecipeId, ShortLinkToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by short-link repository adapters.
    pub enum ShortLinkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "short link repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "short link repository query failed: {message}",
    }
}

/// Token state of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeTokenState {
    /// No recipe with that id.
    RecipeMissing,
    /// The recipe has not been given a token yet.
    Unassigned,
    /// The recipe already carries a token.
    Assigned(ShortLinkToken),
}

/// Result of trying to store a candidate token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTokenOutcome {
    /// The candidate is now the recipe's token.
    Assigned,
    /// Another recipe already uses the candidate.
    Collision,
    /// A concurrent request assigned a different token first.
    AlreadyAssigned(ShortLinkToken),
    /// The recipe disappeared.
    RecipeMissing,
}

/// Port for short-link storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Current token state of `recipe`.
    async fn token_state(
        &self,
        recipe: &RecipeId,
    ) -> Result<RecipeTokenState, ShortLinkRepositoryError>;

    /// Whether any recipe uses `token`.
    async fn token_exists(&self, token: &ShortLinkToken) -> Result<bool, ShortLinkRepositoryError>;

    /// Store `token` on `recipe` only if it has none yet.
    async fn assign(
        &self,
        recipe: &RecipeId,
        token: &ShortLinkToken,
    ) -> Result<AssignTokenOutcome, ShortLinkRepositoryError>;

    /// Recipe carrying `token`.
    async fn resolve(
        &self,
        token: &ShortLinkToken,
    ) -> Result<Option<RecipeId>, ShortLinkRepositoryError>;
}

/// Fixture implementation where no recipe exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShortLinkRepository;

#[async_trait]
impl ShortLinkRepository for FixtureShortLinkRepository {
    async fn token_state(
        &self,
        _recipe: &RecipeId,
    ) -> Result<RecipeTokenState, ShortLinkRepositoryError> {
        Ok(RecipeTokenState::RecipeMissing)
    }

    async fn token_exists(
        &self,
        _token: &ShortLinkToken,
    ) -> Result<bool, ShortLinkRepositoryError> {
        Ok(false)
    }

    async fn assign(
        &self,
        _recipe: &RecipeId,
        _token: &ShortLinkToken,
    ) -> Result<AssignTokenOutcome, ShortLinkRepositoryError> {
        Ok(AssignTokenOutcome::RecipeMissing)
    }

    async fn resolve(
        &self,
        _token: &ShortLinkToken,
    ) -> Result<Option<RecipeId>, ShortLinkRepositoryError> {
        Ok(None)
    }
}
