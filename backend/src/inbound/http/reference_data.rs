//! Tag and ingredient reference data handlers. Read-only and public.
//!
//! ```text
//! GET /api/v1/tags
//! GET /api/v1/tags/{id}
//! GET /api/v1/ingredients?name=
//! GET /api/v1/ingredients/{id}
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::recipe_dto::{IngredientResponse, TagResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_ingredient_id, parse_tag_id};

/// Ingredient search parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientSearch {
    /// Case-insensitive fragment. Names starting with it are listed first.
    pub name: Option<String>,
}

/// Every tag, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags", body = [TagResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["reference-data"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.reference_data.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["reference-data"],
    operation_id = "getTag"
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagResponse>> {
    let id = parse_tag_id(&path)?;
    let tag = state.reference_data.get_tag(&id).await?;
    Ok(web::Json(tag.into()))
}

/// Ingredients, optionally narrowed by a name fragment.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(IngredientSearch),
    responses(
        (status = 200, description = "Ingredients", body = [IngredientResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["reference-data"],
    operation_id = "listIngredients"
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearch>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let ingredients = state
        .reference_data
        .search_ingredients(query.into_inner().name)
        .await?;
    Ok(web::Json(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["reference-data"],
    operation_id = "getIngredient"
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let id = parse_ingredient_id(&path)?;
    let ingredient = state.reference_data.get_ingredient(&id).await?;
    Ok(web::Json(ingredient.into()))
}
