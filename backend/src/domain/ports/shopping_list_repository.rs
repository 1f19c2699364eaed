//! Port reading the raw ingredient lines behind a user's shopping cart.

use async_trait::async_trait;

use crate::domain::{CartIngredientLine, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by shopping list repository adapters.
    pub enum ShoppingListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "shopping list repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "shopping list repository query failed: {message}",
    }
}

/// Port joining cart entries to recipe ingredient lines.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// One line per (cart entry, recipe ingredient) pair; no aggregation.
    async fn cart_lines(
        &self,
        user: &UserId,
    ) -> Result<Vec<CartIngredientLine>, ShoppingListRepositoryError>;
}

/// Fixture implementation with an empty cart.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShoppingListRepository;

#[async_trait]
impl ShoppingListRepository for FixtureShoppingListRepository {
    async fn cart_lines(
        &self,
        _user: &UserId,
    ) -> Result<Vec<CartIngredientLine>, ShoppingListRepositoryError> {
        Ok(Vec::new())
    }
}
