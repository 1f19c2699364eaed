//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Writes run in one transaction covering the recipe row, its tag links and
//! its ingredient lines. Reads load recipes first and then hydrate their
//! associations with one query per association, whatever the page size.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    NewRecipe, RecipePage, RecipeRepository, RecipeRepositoryError, RecipeUpdate,
};
use crate::domain::{
    IngredientId, Recipe, RecipeFilter, RecipeId, RecipeIngredient, RecipeView, Tag, TagId,
    UserId, UserProfile, ValidatedRecipe,
};

use super::diesel_basic_error_mapping::{
    StoreFailure, classify_diesel_error, map_basic_pool_error, offset_to_i64,
};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeChangeset, RecipeIngredientRow, RecipeRow, RecipeTagRow,
    TagRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    cart_entries, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> RecipeRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => RecipeRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation(message) => {
            RecipeRepositoryError::missing_reference(message)
        }
        StoreFailure::Query(message)
        | StoreFailure::UniqueViolation(message)
        | StoreFailure::CheckViolation(message) => RecipeRepositoryError::query(message),
    }
}

fn limit_to_i64(limit: u32) -> i64 {
    i64::from(limit)
}

/// Recipes matching `filter`, as a boxed query that can be counted or paged.
fn filtered_recipes(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(*author.as_uuid()));
    }
    if !filter.tag_slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filter.tag_slugs.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }
    if let Some(user) = filter.favorited_by {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(*user.as_uuid()))
            .select(favorites::recipe_id);
        query = query.filter(recipes::id.eq_any(favorited));
    }
    if let Some(user) = filter.in_cart_of {
        let in_cart = cart_entries::table
            .filter(cart_entries::user_id.eq(*user.as_uuid()))
            .select(cart_entries::recipe_id);
        query = query.filter(recipes::id.eq_any(in_cart));
    }
    query
}

/// Write tag links and ingredient lines for `recipe_id`.
///
/// Ingredient lines go out in a single batch ordered by ingredient name, with
/// the unit copied from the ingredient row.
async fn write_associations(
    conn: &mut AsyncPgConnection,
    recipe_id: Uuid,
    content: &ValidatedRecipe,
) -> QueryResult<()> {
    let tag_rows: Vec<RecipeTagRow> = content
        .tags()
        .iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: tag.0,
        })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&tag_rows)
        .execute(conn)
        .await?;

    let amounts: HashMap<i64, i32> = content
        .ingredients()
        .iter()
        .map(|entry| (entry.ingredient_id.0, entry.amount))
        .collect();
    let ingredient_ids: Vec<i64> = amounts.keys().copied().collect();
    let referenced: Vec<IngredientRow> = ingredients::table
        .filter(ingredients::id.eq_any(&ingredient_ids))
        .order(ingredients::name.asc())
        .select(IngredientRow::as_select())
        .load(conn)
        .await?;

    let lines = ingredient_lines(recipe_id, referenced, &amounts)?;
    diesel::insert_into(recipe_ingredients::table)
        .values(&lines)
        .execute(conn)
        .await?;
    Ok(())
}

/// Pair each requested ingredient with its stored row.
///
/// Fails with a foreign-key violation when a requested ingredient has no row,
/// so the surrounding transaction rolls back instead of storing fewer lines.
fn ingredient_lines(
    recipe_id: Uuid,
    referenced: Vec<IngredientRow>,
    amounts: &HashMap<i64, i32>,
) -> QueryResult<Vec<RecipeIngredientRow>> {
    let lines: Vec<RecipeIngredientRow> = referenced
        .into_iter()
        .filter_map(|row| {
            amounts.get(&row.id).map(|amount| RecipeIngredientRow {
                recipe_id,
                ingredient_id: row.id,
                measurement_unit: row.measurement_unit,
                amount: *amount,
            })
        })
        .collect();
    if lines.len() == amounts.len() {
        return Ok(lines);
    }

    let found: HashSet<i64> = lines.iter().map(|line| line.ingredient_id).collect();
    let mut absent: Vec<i64> = amounts
        .keys()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    absent.sort_unstable();
    Err(DieselError::DatabaseError(
        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
        Box::new(format!("ingredients {absent:?} no longer exist")),
    ))
}

/// Load recipes with their associations, in the order of `ids`.
async fn load_recipes(conn: &mut AsyncPgConnection, ids: &[Uuid]) -> QueryResult<Vec<Recipe>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(RecipeRow, UserRow)> = recipes::table
        .inner_join(users::table)
        .filter(recipes::id.eq_any(ids))
        .select((RecipeRow::as_select(), UserRow::as_select()))
        .load(conn)
        .await?;

    let tag_rows: Vec<(Uuid, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;

    let ingredient_rows: Vec<(Uuid, i64, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::ingredient_id,
            ingredients::name,
            recipe_ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)
        .await?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(Tag {
            id: TagId(row.id),
            name: row.name,
            slug: row.slug,
        });
    }

    let mut lines_by_recipe: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, ingredient_id, name, measurement_unit, amount) in ingredient_rows {
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredient {
                ingredient_id: IngredientId(ingredient_id),
                name,
                measurement_unit,
                amount,
            });
    }

    let mut by_id: HashMap<Uuid, Recipe> = rows
        .into_iter()
        .map(|(row, author)| {
            let recipe = Recipe {
                id: RecipeId::from_uuid(row.id),
                author: UserProfile {
                    id: UserId::from_uuid(author.id),
                    username: author.username,
                },
                name: row.name,
                text: row.text,
                image: row.image,
                cooking_time: row.cooking_time,
                created_at: row.created_at,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                ingredients: lines_by_recipe.remove(&row.id).unwrap_or_default(),
            };
            (row.id, recipe)
        })
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Decorate recipes with the viewer's favorite and cart flags.
async fn load_views(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
    viewer: Option<UserId>,
) -> QueryResult<Vec<RecipeView>> {
    let loaded = load_recipes(conn, ids).await?;
    let Some(viewer) = viewer else {
        return Ok(loaded.into_iter().map(RecipeView::detached).collect());
    };

    let favorited: HashSet<Uuid> = favorites::table
        .filter(favorites::user_id.eq(*viewer.as_uuid()))
        .filter(favorites::recipe_id.eq_any(ids))
        .select(favorites::recipe_id)
        .load::<Uuid>(conn)
        .await?
        .into_iter()
        .collect();
    let in_cart: HashSet<Uuid> = cart_entries::table
        .filter(cart_entries::user_id.eq(*viewer.as_uuid()))
        .filter(cart_entries::recipe_id.eq_any(ids))
        .select(cart_entries::recipe_id)
        .load::<Uuid>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(loaded
        .into_iter()
        .map(|recipe| {
            let id = *recipe.id.as_uuid();
            RecipeView {
                recipe,
                is_favorited: favorited.contains(&id),
                is_in_shopping_cart: in_cart.contains(&id),
            }
        })
        .collect())
}

/// Return the subset of `wanted` absent from `found`, keeping input order.
fn missing<T: Copy + Eq + std::hash::Hash>(wanted: &[T], found: &[T]) -> Vec<T> {
    let found: HashSet<T> = found.iter().copied().collect();
    wanted
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let found: Vec<IngredientId> = ingredients::table
            .filter(ingredients::id.eq_any(&raw))
            .select(ingredients::id)
            .load::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(IngredientId)
            .collect();
        Ok(missing(ids, &found))
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let found: Vec<TagId> = tags::table
            .filter(tags::id.eq_any(&raw))
            .select(tags::id)
            .load::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(TagId)
            .collect();
        Ok(missing(ids, &found))
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = *recipe.id.as_uuid();
        let image = recipe
            .content
            .image()
            .ok_or_else(|| RecipeRepositoryError::query("new recipe without image"))?;
        let row = NewRecipeRow {
            id: recipe_id,
            author_id: *recipe.author.as_uuid(),
            name: recipe.content.name(),
            text: recipe.content.text(),
            image,
            cooking_time: recipe.content.cooking_time(),
            created_at: recipe.created_at,
        };

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(recipes::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                write_associations(conn, recipe_id, &recipe.content).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, update: &RecipeUpdate) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = *update.id.as_uuid();
        let changeset = RecipeChangeset {
            name: update.content.name(),
            text: update.content.text(),
            image: update.content.image(),
            cooking_time: update.content.cooking_time(),
        };

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let touched = diesel::update(recipes::table.find(recipe_id))
                    .set(&changeset)
                    .execute(conn)
                    .await?;
                if touched == 0 {
                    return Ok(false);
                }
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table
                        .filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                write_associations(conn, recipe_id, &update.content).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(recipes::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut found = load_recipes(&mut conn, &[*id.as_uuid()])
            .await
            .map_err(map_diesel_error)?;
        Ok(found.pop())
    }

    async fn find_view(
        &self,
        id: &RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut found = load_views(&mut conn, &[*id.as_uuid()], viewer)
            .await
            .map_err(map_diesel_error)?;
        Ok(found.pop())
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        offset: u64,
        limit: u32,
        viewer: Option<UserId>,
    ) -> Result<RecipePage, RecipeRepositoryError> {
        let offset = offset_to_i64(offset, RecipeRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_recipes(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let page_ids: Vec<Uuid> = filtered_recipes(filter)
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .offset(offset)
            .limit(limit_to_i64(limit))
            .select(recipes::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let views = load_views(&mut conn, &page_ids, viewer)
            .await
            .map_err(map_diesel_error)?;
        Ok(RecipePage {
            recipes: views,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for helpers that do not need a database.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn missing_keeps_request_order() {
        let wanted = [TagId(3), TagId(1), TagId(2)];
        assert_eq!(missing(&wanted, &[TagId(1)]), vec![TagId(3), TagId(2)]);
    }

    fn ingredient(id: i64, name: &str) -> IngredientRow {
        IngredientRow {
            id,
            name: name.to_owned(),
            measurement_unit: "g".to_owned(),
        }
    }

    #[rstest]
    fn ingredient_lines_carry_units_and_amounts() {
        let amounts = HashMap::from([(1, 200), (2, 3)]);
        let lines = ingredient_lines(
            Uuid::nil(),
            vec![ingredient(1, "flour"), ingredient(2, "sugar")],
            &amounts,
        )
        .expect("every ingredient present");

        let pairs: Vec<_> = lines
            .iter()
            .map(|line| (line.ingredient_id, line.amount, line.measurement_unit.as_str()))
            .collect();
        assert_eq!(pairs, [(1, 200, "g"), (2, 3, "g")]);
    }

    #[rstest]
    fn vanished_ingredient_fails_the_write() {
        let amounts = HashMap::from([(1, 200), (7, 3)]);
        let error = ingredient_lines(Uuid::nil(), vec![ingredient(1, "flour")], &amounts)
            .expect_err("ingredient 7 is gone");

        assert_eq!(
            map_diesel_error(error),
            RecipeRepositoryError::missing_reference("ingredients [7] no longer exist")
        );
    }

    #[rstest]
    fn foreign_key_violation_is_missing_reference() {
        use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};

        struct Info;
        impl DatabaseErrorInformation for Info {
            fn message(&self) -> &str {
                "insert violates foreign key constraint"
            }
            fn details(&self) -> Option<&str> {
                None
            }
            fn hint(&self) -> Option<&str> {
                None
            }
            fn table_name(&self) -> Option<&str> {
                None
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                Some("recipe_ingredients_ingredient_id_fkey")
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(Info),
        ));
        assert_eq!(
            error,
            RecipeRepositoryError::missing_reference("recipe_ingredients_ingredient_id_fkey")
        );
    }
}
