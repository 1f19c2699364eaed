//! Tag and ingredient lookups plus bulk CSV import.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ReferenceDataQuery, ReferenceDataRepository, ReferenceDataRepositoryError,
};
use crate::domain::{
    Error, ImportReport, Ingredient, IngredientId, ReferenceDataError, Tag, TagId,
    parse_ingredients_csv, parse_tags_csv,
};

fn map_repository_error(error: ReferenceDataRepositoryError) -> Error {
    match error {
        ReferenceDataRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reference data repository unavailable: {message}"))
        }
        ReferenceDataRepositoryError::Query { message } => {
            Error::internal(format!("reference data repository error: {message}"))
        }
        ReferenceDataRepositoryError::Constraint { message } => Error::conflict(message),
    }
}

fn map_parse_error(error: &ReferenceDataError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({"line": error.line()}))
}

/// Service implementing [`ReferenceDataQuery`] and the import use-case.
#[derive(Clone)]
pub struct ReferenceDataService<R> {
    repo: Arc<R>,
}

impl<R> ReferenceDataService<R> {
    /// Create the service over a reference data repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> ReferenceDataService<R>
where
    R: ReferenceDataRepository,
{
    /// Import `name,measurement_unit` rows.
    ///
    /// The whole file is parsed before anything is written; a malformed row
    /// aborts with [`crate::domain::ErrorCode::InvalidRequest`].
    ///
    /// # Errors
    /// Parse failures, constraint conflicts and repository failures.
    pub async fn import_ingredients_csv(&self, contents: &str) -> Result<ImportReport, Error> {
        let rows = parse_ingredients_csv(contents).map_err(|err| map_parse_error(&err))?;
        let report = self
            .repo
            .import_ingredients(&rows)
            .await
            .map_err(map_repository_error)?;
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "ingredients imported"
        );
        Ok(report)
    }

    /// Import `name,slug` rows.
    ///
    /// # Errors
    /// Parse failures, constraint conflicts and repository failures.
    pub async fn import_tags_csv(&self, contents: &str) -> Result<ImportReport, Error> {
        let rows = parse_tags_csv(contents).map_err(|err| map_parse_error(&err))?;
        let report = self
            .repo
            .import_tags(&rows)
            .await
            .map_err(map_repository_error)?;
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "tags imported"
        );
        Ok(report)
    }
}

#[async_trait]
impl<R> ReferenceDataQuery for ReferenceDataService<R>
where
    R: ReferenceDataRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.repo.list_tags().await.map_err(map_repository_error)
    }

    async fn get_tag(&self, id: &TagId) -> Result<Tag, Error> {
        self.repo
            .find_tag(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn search_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let fragment = name
            .map(|raw| raw.trim().to_owned())
            .filter(|trimmed| !trimmed.is_empty());
        self.repo
            .search_ingredients(fragment)
            .await
            .map_err(map_repository_error)
    }

    async fn get_ingredient(&self, id: &IngredientId) -> Result<Ingredient, Error> {
        self.repo
            .find_ingredient(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
