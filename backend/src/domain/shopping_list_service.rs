//! Shopping list aggregation and export.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{
    ShoppingListDocument, ShoppingListQuery, ShoppingListRenderer, ShoppingListRepository,
    ShoppingListRepositoryError, ShoppingListTemplate,
};
use crate::domain::{Error, ShoppingList, UserId};

fn map_repository_error(error: ShoppingListRepositoryError) -> Error {
    match error {
        ShoppingListRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("shopping list repository unavailable: {message}"))
        }
        ShoppingListRepositoryError::Query { message } => {
            Error::internal(format!("shopping list repository error: {message}"))
        }
    }
}

/// Service implementing [`ShoppingListQuery`].
#[derive(Clone)]
pub struct ShoppingListService<R, D> {
    repo: Arc<R>,
    renderer: Arc<D>,
    template: ShoppingListTemplate,
}

impl<R, D> ShoppingListService<R, D> {
    /// Create the service with the default template.
    pub fn new(repo: Arc<R>, renderer: Arc<D>) -> Self {
        Self::with_template(repo, renderer, ShoppingListTemplate::default())
    }

    /// Create the service with a custom template.
    pub fn with_template(repo: Arc<R>, renderer: Arc<D>, template: ShoppingListTemplate) -> Self {
        Self {
            repo,
            renderer,
            template,
        }
    }
}

#[async_trait]
impl<R, D> ShoppingListQuery for ShoppingListService<R, D>
where
    R: ShoppingListRepository,
    D: ShoppingListRenderer,
{
    async fn build(&self, user: &UserId) -> Result<ShoppingList, Error> {
        let lines = self
            .repo
            .cart_lines(user)
            .await
            .map_err(map_repository_error)?;
        if lines.is_empty() {
            return Ok(ShoppingList::empty());
        }
        let list = ShoppingList::aggregate(lines);
        debug!(user = %user, items = list.items().len(), "shopping list aggregated");
        Ok(list)
    }

    async fn download(&self, user: &UserId) -> Result<ShoppingListDocument, Error> {
        let list = self.build(user).await?;
        self.renderer.render(&list, &self.template).map_err(|err| {
            error!(error = %err, "shopping list rendering failed");
            Error::internal(err.to_string())
        })
    }
}

#[cfg(test)]
#[path = "shopping_list_service_tests.rs"]
mod tests;
