//! PostgreSQL-backed `ShoppingListRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ShoppingListRepository, ShoppingListRepositoryError};
use crate::domain::{CartIngredientLine, IngredientId, RecipeId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{cart_entries, ingredients, recipe_ingredients};

/// Diesel-backed implementation of the shopping list repository port.
#[derive(Clone)]
pub struct DieselShoppingListRepository {
    pool: DbPool,
}

impl DieselShoppingListRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShoppingListRepositoryError {
    map_basic_pool_error(error, ShoppingListRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShoppingListRepositoryError {
    map_basic_diesel_error(
        error,
        ShoppingListRepositoryError::query,
        ShoppingListRepositoryError::connection,
    )
}

#[async_trait]
impl ShoppingListRepository for DieselShoppingListRepository {
    async fn cart_lines(
        &self,
        user: &UserId,
    ) -> Result<Vec<CartIngredientLine>, ShoppingListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(Uuid, i64, String, String, i32)> = cart_entries::table
            .inner_join(
                recipe_ingredients::table
                    .on(recipe_ingredients::recipe_id.eq(cart_entries::recipe_id)),
            )
            .inner_join(
                ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)),
            )
            .filter(cart_entries::user_id.eq(*user.as_uuid()))
            .select((
                cart_entries::recipe_id,
                recipe_ingredients::ingredient_id,
                ingredients::name,
                recipe_ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(recipe_id, ingredient_id, name, measurement_unit, amount)| CartIngredientLine {
                    recipe_id: RecipeId::from_uuid(recipe_id),
                    ingredient_id: IngredientId(ingredient_id),
                    name,
                    measurement_unit,
                    amount,
                },
            )
            .collect())
    }
}
