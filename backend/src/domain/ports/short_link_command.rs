//! Driving port for recipe short links.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, ShortLinkToken};

/// Use-case port for issuing and resolving short-link tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkCommand: Send + Sync {
    /// The recipe's token, generating one on first use.
    async fn get_or_create_token(&self, recipe: &RecipeId) -> Result<ShortLinkToken, Error>;

    /// The recipe a token points at.
    async fn resolve(&self, token: &ShortLinkToken) -> Result<RecipeId, Error>;
}
