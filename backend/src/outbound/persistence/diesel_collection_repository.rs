//! PostgreSQL-backed `CollectionRepository` implementation.
//!
//! Favorites and the shopping cart live in two tables with identical shape;
//! the primary key on `(user_id, recipe_id)` is what turns a concurrent
//! duplicate add into [`CollectionRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{CollectionKind, RecipeId, UserId};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{cart_entries, favorites};

/// Diesel-backed implementation of the collection repository port.
#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CollectionRepositoryError {
    map_basic_pool_error(error, CollectionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CollectionRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => CollectionRepositoryError::connection(message),
        StoreFailure::UniqueViolation(_) => CollectionRepositoryError::duplicate(),
        StoreFailure::ForeignKeyViolation(constraint) if constraint.ends_with("_user_id_fkey") => {
            CollectionRepositoryError::missing_user()
        }
        StoreFailure::ForeignKeyViolation(_) => CollectionRepositoryError::missing_recipe(),
        StoreFailure::Query(message) | StoreFailure::CheckViolation(message) => {
            CollectionRepositoryError::query(message)
        }
    }
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn contains(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user, recipe) = (*user.as_uuid(), *recipe.as_uuid());
        let query = match kind {
            CollectionKind::Favorite => diesel::select(exists(
                favorites::table
                    .filter(favorites::user_id.eq(user))
                    .filter(favorites::recipe_id.eq(recipe)),
            ))
            .get_result::<bool>(&mut conn)
            .await,
            CollectionKind::Cart => diesel::select(exists(
                cart_entries::table
                    .filter(cart_entries::user_id.eq(user))
                    .filter(cart_entries::recipe_id.eq(recipe)),
            ))
            .get_result::<bool>(&mut conn)
            .await,
        };
        query.map_err(map_diesel_error)
    }

    async fn insert(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user, recipe) = (*user.as_uuid(), *recipe.as_uuid());
        let inserted = match kind {
            CollectionKind::Favorite => {
                diesel::insert_into(favorites::table)
                    .values((favorites::user_id.eq(user), favorites::recipe_id.eq(recipe)))
                    .execute(&mut conn)
                    .await
            }
            CollectionKind::Cart => {
                diesel::insert_into(cart_entries::table)
                    .values((
                        cart_entries::user_id.eq(user),
                        cart_entries::recipe_id.eq(recipe),
                    ))
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map(|_| ()).map_err(map_diesel_error)
    }

    async fn remove(
        &self,
        kind: CollectionKind,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user, recipe) = (*user.as_uuid(), *recipe.as_uuid());
        let removed = match kind {
            CollectionKind::Favorite => {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user))
                        .filter(favorites::recipe_id.eq(recipe)),
                )
                .execute(&mut conn)
                .await
            }
            CollectionKind::Cart => {
                diesel::delete(
                    cart_entries::table
                        .filter(cart_entries::user_id.eq(user))
                        .filter(cart_entries::recipe_id.eq(recipe)),
                )
                .execute(&mut conn)
                .await
            }
        };
        removed.map(|rows| rows > 0).map_err(map_diesel_error)
    }
}
