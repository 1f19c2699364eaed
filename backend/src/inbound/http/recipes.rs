//! Recipe HTTP handlers.
//!
//! ```text
//! GET    /api/v1/recipes
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! GET    /api/v1/recipes/{id}/get-link
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::RecipeListRequest;
use crate::domain::{Error, RecipeDraft, RecipeOperation, RecipeView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::{QueryParams, public_request_url};
use crate::inbound::http::recipe_dto::{RecipePayload, RecipeRequest, RecipeResponse};
use crate::inbound::http::schemas::{ErrorSchema, RecipePageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_flag, parse_page_request, parse_recipe_id, parse_user_id,
};

/// Body of the `get-link` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    #[schema(rename = "short-link", example = "https://recipes.example/s/a1B2c3D4")]
    pub short_link: String,
}

fn parse_list_request(params: &QueryParams) -> Result<RecipeListRequest, Error> {
    let flag = |key: &'static str| {
        params
            .first(key)
            .map(|raw| parse_flag(raw, FieldName::new(key)))
            .transpose()
            .map(Option::unwrap_or_default)
    };
    Ok(RecipeListRequest {
        author: params
            .first("author")
            .map(|raw| parse_user_id(raw, FieldName::new("author")))
            .transpose()?,
        tag_slugs: params.all("tags"),
        only_favorited: flag("is_favorited")?,
        only_in_cart: flag("is_in_shopping_cart")?,
        page: parse_page_request(params.first("page"), params.first("limit"))?,
    })
}

fn full(view: RecipeView, operation: RecipeOperation) -> RecipePayload {
    RecipePayload::from(view.present(operation))
}

/// List recipes, newest first.
///
/// Filters: `author` (user id), `tags` (slug, repeatable, any-of),
/// `is_favorited` and `is_in_shopping_cart` (`0`/`1`). The personal filters
/// yield an empty page for anonymous callers.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("author" = Option<String>, Query, description = "Author id"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs"),
        ("is_favorited" = Option<u8>, Query, description = "Only favorites"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "Only cart entries")
    ),
    responses(
        (status = 200, description = "Recipes", body = RecipePageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<web::Json<Page<RecipePayload>>> {
    let viewer = session.user_id()?;
    let request = parse_list_request(&QueryParams::from_request(&req))?;
    let paged = state.recipes_query.list(&request, viewer).await?;
    let base = public_request_url(&state.public_base_url, &req)?;
    Ok(web::Json(
        Page::new(paged.items, paged.total, request.page, &base)
            .map(|view| full(view, RecipeOperation::List)),
    ))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipePayload>> {
    let recipe_id = parse_recipe_id(&path)?;
    let viewer = session.user_id()?;
    let view = state.recipes_query.get(&recipe_id, viewer).await?;
    Ok(web::Json(full(view, RecipeOperation::Retrieve)))
}

/// Publish a recipe authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown tag or ingredient", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("SessionCookie" = []))
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let view = state.recipes.create(&author, draft).await?;
    info!(recipe_id = %view.recipe.id, author = %author, "recipe created");
    Ok(HttpResponse::Created().json(full(view, RecipeOperation::Create)))
}

/// Replace a recipe's contents. Only its author may do this.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("SessionCookie" = []))
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipePayload>> {
    let actor = session.require_user_id()?;
    let recipe_id = parse_recipe_id(&path)?;
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let view = state.recipes.update(&actor, &recipe_id, draft).await?;
    Ok(web::Json(full(view, RecipeOperation::Update)))
}

/// Delete a recipe. Only its author may do this.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let recipe_id = parse_recipe_id(&path)?;
    state.recipes.delete(&actor, &recipe_id).await?;
    info!(recipe_id = %recipe_id, "recipe deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Return the recipe's short link, creating it on first request.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/get-link",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeShortLink"
)]
#[get("/recipes/{id}/get-link")]
pub async fn get_short_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let recipe_id = parse_recipe_id(&path)?;
    let token = state.short_links.get_or_create_token(&recipe_id).await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: format!("{}/s/{token}", state.public_base_url),
    }))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
