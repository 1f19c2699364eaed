//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
}

// ---------------------------------------------------------------------------
// Reference data models
// ---------------------------------------------------------------------------

/// Row struct for reading from the ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Insertable struct for importing ingredients.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

/// Row struct for reading from the tags table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Insertable struct for importing tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

// ---------------------------------------------------------------------------
// Recipe models
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating recipes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Changeset for replacing recipe content. A `None` image leaves the stored
/// value untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeChangeset<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub image: Option<&'a str>,
    pub cooking_time: i32,
}

/// Insertable recipe to tag link.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: Uuid,
    pub tag_id: i64,
}

/// Insertable recipe ingredient line.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub ingredient_id: i64,
    pub measurement_unit: String,
    pub amount: i32,
}
