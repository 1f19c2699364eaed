//! Driving port for recipe reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Paged, RecipeId, RecipeView, UserId};

/// Listing parameters as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListRequest {
    /// Restrict to one author.
    pub author: Option<UserId>,
    /// Restrict to recipes carrying any of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Only the viewer's favorites.
    pub only_favorited: bool,
    /// Only recipes in the viewer's shopping cart.
    pub only_in_cart: bool,
    /// Requested page.
    pub page: PageRequest,
}

/// Use-case port for reading recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// One recipe with flags relative to `viewer`.
    async fn get(&self, recipe: &RecipeId, viewer: Option<UserId>) -> Result<RecipeView, Error>;

    /// A page of recipes, newest first.
    async fn list(
        &self,
        request: &RecipeListRequest,
        viewer: Option<UserId>,
    ) -> Result<Paged<RecipeView>, Error>;
}
