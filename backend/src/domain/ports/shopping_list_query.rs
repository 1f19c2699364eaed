//! Driving port for shopping list export.

use async_trait::async_trait;

use crate::domain::ports::ShoppingListDocument;
use crate::domain::{Error, ShoppingList, UserId};

/// Use-case port for the aggregated shopping list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Aggregate the user's cart.
    async fn build(&self, user: &UserId) -> Result<ShoppingList, Error>;

    /// Aggregate the user's cart and render it as a document.
    async fn download(&self, user: &UserId) -> Result<ShoppingListDocument, Error>;
}
