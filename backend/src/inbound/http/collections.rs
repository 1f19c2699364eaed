//! Favorites and shopping cart HTTP handlers.
//!
//! ```text
//! POST   /api/v1/recipes/{id}/favorite
//! DELETE /api/v1/recipes/{id}/favorite
//! POST   /api/v1/recipes/{id}/shopping_cart
//! DELETE /api/v1/recipes/{id}/shopping_cart
//! GET    /api/v1/recipes/download_shopping_cart
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, post, web};
use tracing::debug;

use crate::domain::CollectionKind;
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipe_dto::RecipeSummaryResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_recipe_id;

async fn add(
    kind: CollectionKind,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_id(&path)?;
    let summary = state.collections.add(kind, &user, &recipe).await?;
    debug!(collection = kind.as_str(), %recipe, "recipe added");
    Ok(HttpResponse::Created().json(RecipeSummaryResponse::from(summary)))
}

async fn remove(
    kind: CollectionKind,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_id(&path)?;
    state.collections.remove(kind, &user, &recipe).await?;
    debug!(collection = kind.as_str(), %recipe, "recipe removed");
    Ok(HttpResponse::NoContent().finish())
}

/// Mark a recipe as a favorite.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 400, description = "Already a favorite", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["collections"],
    operation_id = "addFavorite",
    security(("SessionCookie" = []))
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add(CollectionKind::Favorite, state, session, path).await
}

/// Remove a recipe from favorites.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not a favorite", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["collections"],
    operation_id = "removeFavorite",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove(CollectionKind::Favorite, state, session, path).await
}

/// Put a recipe in the shopping cart.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 400, description = "Already in the cart", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["collections"],
    operation_id = "addToShoppingCart",
    security(("SessionCookie" = []))
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add(CollectionKind::Cart, state, session, path).await
}

/// Take a recipe out of the shopping cart.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in the cart", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["collections"],
    operation_id = "removeFromShoppingCart",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove(CollectionKind::Cart, state, session, path).await
}

/// Download the caller's aggregated shopping list as an attachment.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Shopping list document", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["collections"],
    operation_id = "downloadShoppingCart",
    security(("SessionCookie" = []))
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let document = state.shopping_list.download(&user).await?;
    Ok(HttpResponse::Ok()
        .content_type(document.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.file_name)],
        })
        .body(document.body))
}
