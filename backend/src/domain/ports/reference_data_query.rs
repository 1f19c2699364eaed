//! Driving port for read-only reference data.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Use-case port for tags and ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDataQuery: Send + Sync {
    /// Every tag.
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// One tag.
    async fn get_tag(&self, id: &TagId) -> Result<Tag, Error>;

    /// Ingredients matching an optional name fragment.
    async fn search_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error>;

    /// One ingredient.
    async fn get_ingredient(&self, id: &IngredientId) -> Result<Ingredient, Error>;
}
