//! Port for ingredient and tag reference data.

use async_trait::async_trait;

use crate::domain::{ImportReport, Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reference data adapters.
    pub enum ReferenceDataRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "reference data repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "reference data repository query failed: {message}",
        /// An imported row clashes with an existing row on a unique column.
        Constraint { message: String } =>
            "reference data constraint violated: {message}",
    }
}

/// Port for reference data reads and bulk imports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDataRepository: Send + Sync {
    /// Every tag ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, ReferenceDataRepositoryError>;

    /// One tag.
    async fn find_tag(&self, id: &TagId) -> Result<Option<Tag>, ReferenceDataRepositoryError>;

    /// Ingredients whose name contains `fragment` (case-insensitive), names
    /// starting with it first, then by name. `None` lists everything.
    async fn search_ingredients(
        &self,
        fragment: Option<String>,
    ) -> Result<Vec<Ingredient>, ReferenceDataRepositoryError>;

    /// One ingredient.
    async fn find_ingredient(
        &self,
        id: &IngredientId,
    ) -> Result<Option<Ingredient>, ReferenceDataRepositoryError>;

    /// Insert ingredients in one transaction, skipping identical rows.
    async fn import_ingredients(
        &self,
        rows: &[NewIngredient],
    ) -> Result<ImportReport, ReferenceDataRepositoryError>;

    /// Insert tags in one transaction, skipping identical rows.
    async fn import_tags(&self, rows: &[NewTag]) -> Result<ImportReport, ReferenceDataRepositoryError>;
}

/// Fixture implementation with no reference data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReferenceDataRepository;

#[async_trait]
impl ReferenceDataRepository for FixtureReferenceDataRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, ReferenceDataRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_tag(&self, _id: &TagId) -> Result<Option<Tag>, ReferenceDataRepositoryError> {
        Ok(None)
    }

    async fn search_ingredients(
        &self,
        _fragment: Option<String>,
    ) -> Result<Vec<Ingredient>, ReferenceDataRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_ingredient(
        &self,
        _id: &IngredientId,
    ) -> Result<Option<Ingredient>, ReferenceDataRepositoryError> {
        Ok(None)
    }

    async fn import_ingredients(
        &self,
        rows: &[NewIngredient],
    ) -> Result<ImportReport, ReferenceDataRepositoryError> {
        Ok(ImportReport {
            inserted: 0,
            skipped: rows.len(),
        })
    }

    async fn import_tags(&self, rows: &[NewTag]) -> Result<ImportReport, ReferenceDataRepositoryError> {
        Ok(ImportReport {
            inserted: 0,
            skipped: rows.len(),
        })
    }
}
