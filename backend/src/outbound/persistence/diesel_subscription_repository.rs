//! PostgreSQL-backed `SubscriptionRepository` implementation.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{SubscriptionPage, SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{RecipeId, RecipeSummary, Subscription, SubscriptionView, UserId, UserProfile};

use super::diesel_basic_error_mapping::{
    StoreFailure, classify_diesel_error, map_basic_pool_error, offset_to_i64,
};
use super::models::{RecipeRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recipes, subscriptions, users};

/// Diesel-backed implementation of the subscription repository port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    map_basic_pool_error(error, SubscriptionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SubscriptionRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        StoreFailure::UniqueViolation(_) => SubscriptionRepositoryError::duplicate(),
        StoreFailure::CheckViolation(_) => SubscriptionRepositoryError::self_subscription(),
        StoreFailure::ForeignKeyViolation(_) => SubscriptionRepositoryError::missing_user(),
        StoreFailure::Query(message) => SubscriptionRepositoryError::query(message),
    }
}

fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

async fn author_view(
    conn: &mut AsyncPgConnection,
    author: &UserProfile,
    recipes_limit: u32,
) -> QueryResult<SubscriptionView> {
    let author_id = *author.id.as_uuid();
    let recipes_count: i64 = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .count()
        .get_result(conn)
        .await?;
    let newest: Vec<RecipeRow> = recipes::table
        .filter(recipes::author_id.eq(author_id))
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .limit(i64::from(recipes_limit))
        .select(RecipeRow::as_select())
        .load(conn)
        .await?;

    Ok(SubscriptionView {
        author: author.clone(),
        recipes: newest
            .into_iter()
            .map(|row| RecipeSummary {
                id: RecipeId::from_uuid(row.id),
                name: row.name,
                image: row.image,
                cooking_time: row.cooking_time,
            })
            .collect(),
        recipes_count: to_count(recipes_count),
    })
}

fn pair_filter(
    subscription: &Subscription,
) -> diesel::dsl::Filter<
    diesel::dsl::Filter<subscriptions::table, diesel::dsl::Eq<subscriptions::follower_id, uuid::Uuid>>,
    diesel::dsl::Eq<subscriptions::author_id, uuid::Uuid>,
> {
    subscriptions::table
        .filter(subscriptions::follower_id.eq(*subscription.follower().as_uuid()))
        .filter(subscriptions::author_id.eq(*subscription.author().as_uuid()))
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn find_user(
        &self,
        id: &UserId,
    ) -> Result<Option<UserProfile>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| UserProfile {
            id: UserId::from_uuid(row.id),
            username: row.username,
        }))
    }

    async fn exists(&self, subscription: &Subscription) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(pair_filter(subscription)))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert(&self, subscription: &Subscription) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::follower_id.eq(*subscription.follower().as_uuid()),
                subscriptions::author_id.eq(*subscription.author().as_uuid()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove(&self, subscription: &Subscription) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(pair_filter(subscription))
            .execute(&mut conn)
            .await
            .map(|rows| rows > 0)
            .map_err(map_diesel_error)
    }

    async fn view(
        &self,
        author: &UserProfile,
        recipes_limit: u32,
    ) -> Result<SubscriptionView, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        author_view(&mut conn, author, recipes_limit)
            .await
            .map_err(map_diesel_error)
    }

    async fn list(
        &self,
        follower: &UserId,
        offset: u64,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<SubscriptionPage, SubscriptionRepositoryError> {
        let offset = offset_to_i64(offset, SubscriptionRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let follower_id = *follower.as_uuid();

        let total: i64 = subscriptions::table
            .filter(subscriptions::follower_id.eq(follower_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let authors: Vec<UserRow> = subscriptions::table
            .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
            .filter(subscriptions::follower_id.eq(follower_id))
            .order((users::username.asc(), users::id.asc()))
            .offset(offset)
            .limit(i64::from(limit))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut entries = Vec::with_capacity(authors.len());
        for row in authors {
            let profile = UserProfile {
                id: UserId::from_uuid(row.id),
                username: row.username,
            };
            entries.push(
                author_view(&mut conn, &profile, recipes_limit)
                    .await
                    .map_err(map_diesel_error)?,
            );
        }

        Ok(SubscriptionPage {
            entries,
            total: to_count(total),
        })
    }
}
