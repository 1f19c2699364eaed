//! PostgreSQL-backed `ReferenceDataRepository` implementation.
//!
//! Imports run in one transaction. Each row is inserted with
//! `ON CONFLICT DO NOTHING`; a row that did not insert is compared with the
//! stored one and either counted as skipped or aborts the whole import.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ReferenceDataRepository, ReferenceDataRepositoryError};
use crate::domain::{ImportReport, Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Diesel-backed implementation of the reference data repository port.
#[derive(Clone)]
pub struct DieselReferenceDataRepository {
    pool: DbPool,
}

impl DieselReferenceDataRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside an import transaction.
#[derive(Debug)]
enum ImportFailure {
    Store(DieselError),
    Conflict(String),
}

impl From<DieselError> for ImportFailure {
    fn from(error: DieselError) -> Self {
        Self::Store(error)
    }
}

fn map_pool_error(error: PoolError) -> ReferenceDataRepositoryError {
    map_basic_pool_error(error, ReferenceDataRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ReferenceDataRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ReferenceDataRepositoryError::connection(message),
        StoreFailure::UniqueViolation(message)
        | StoreFailure::CheckViolation(message)
        | StoreFailure::ForeignKeyViolation(message) => {
            ReferenceDataRepositoryError::constraint(message)
        }
        StoreFailure::Query(message) => ReferenceDataRepositoryError::query(message),
    }
}

fn map_import_failure(failure: ImportFailure) -> ReferenceDataRepositoryError {
    match failure {
        ImportFailure::Store(error) => map_diesel_error(error),
        ImportFailure::Conflict(message) => ReferenceDataRepositoryError::constraint(message),
    }
}

fn to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: IngredientId(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

fn to_tag(row: TagRow) -> Tag {
    Tag {
        id: TagId(row.id),
        name: row.name,
        slug: row.slug,
    }
}

/// Escape `LIKE` metacharacters so a fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Move names starting with `fragment` ahead of names merely containing it,
/// keeping name order within each group.
fn prefix_matches_first(rows: Vec<Ingredient>, fragment: &str) -> Vec<Ingredient> {
    let needle = fragment.to_lowercase();
    let (mut prefixed, rest): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|row| row.name.to_lowercase().starts_with(&needle));
    prefixed.extend(rest);
    prefixed
}

#[async_trait]
impl ReferenceDataRepository for DieselReferenceDataRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, ReferenceDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order((tags::name.asc(), tags::id.asc()))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(to_tag).collect())
    }

    async fn find_tag(&self, id: &TagId) -> Result<Option<Tag>, ReferenceDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.0)
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(to_tag))
    }

    async fn search_ingredients(
        &self,
        fragment: Option<String>,
    ) -> Result<Vec<Ingredient>, ReferenceDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .select(IngredientRow::as_select())
            .into_boxed();
        if let Some(fragment) = fragment.as_deref() {
            query = query.filter(ingredients::name.ilike(format!("%{}%", escape_like(fragment))));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        let found: Vec<Ingredient> = rows.into_iter().map(to_ingredient).collect();
        Ok(match fragment {
            Some(fragment) => prefix_matches_first(found, &fragment),
            None => found,
        })
    }

    async fn find_ingredient(
        &self,
        id: &IngredientId,
    ) -> Result<Option<Ingredient>, ReferenceDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.0)
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(to_ingredient))
    }

    async fn import_ingredients(
        &self,
        rows: &[NewIngredient],
    ) -> Result<ImportReport, ReferenceDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, ImportFailure, _>(|conn| {
            async move {
                let mut report = ImportReport::default();
                for row in rows {
                    let inserted = diesel::insert_into(ingredients::table)
                        .values(NewIngredientRow {
                            name: &row.name,
                            measurement_unit: &row.measurement_unit,
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                    if inserted > 0 {
                        report.inserted += 1;
                        continue;
                    }

                    let stored: String = ingredients::table
                        .filter(ingredients::name.eq(&row.name))
                        .select(ingredients::measurement_unit)
                        .first(conn)
                        .await?;
                    if stored != row.measurement_unit {
                        return Err(ImportFailure::Conflict(format!(
                            "ingredient {} already exists with unit {stored}",
                            row.name
                        )));
                    }
                    report.skipped += 1;
                }
                Ok(report)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_import_failure)
    }

    async fn import_tags(&self, rows: &[NewTag]) -> Result<ImportReport, ReferenceDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, ImportFailure, _>(|conn| {
            async move {
                let mut report = ImportReport::default();
                for row in rows {
                    let inserted = diesel::insert_into(tags::table)
                        .values(NewTagRow {
                            name: &row.name,
                            slug: &row.slug,
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                    if inserted > 0 {
                        report.inserted += 1;
                        continue;
                    }

                    let stored: Option<TagRow> = tags::table
                        .filter(tags::name.eq(&row.name).or(tags::slug.eq(&row.slug)))
                        .select(TagRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    match stored {
                        Some(tag) if tag.name == row.name && tag.slug == row.slug => {
                            report.skipped += 1;
                        }
                        _ => {
                            return Err(ImportFailure::Conflict(format!(
                                "tag {} or slug {} already exists with different values",
                                row.name, row.slug
                            )));
                        }
                    }
                }
                Ok(report)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_import_failure)
    }
}
