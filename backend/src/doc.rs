//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated with `utoipa::path` together
//! with the schema wrappers from [`crate::inbound::http::schemas`] and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::recipe_dto::{
    AuthorResponse, IngredientAmountRequest, IngredientResponse, RecipeIngredientResponse,
    RecipeRequest, RecipeResponse, RecipeSummaryResponse, SubscriptionResponse, TagResponse,
};
use crate::inbound::http::recipes::ShortLinkResponse;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, RecipePageSchema, SubscriptionPageSchema,
};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipes backend API",
        description = "Recipe sharing: recipes, favorites, shopping lists, subscriptions and reference data."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::get_short_link,
        crate::inbound::http::collections::add_favorite,
        crate::inbound::http::collections::remove_favorite,
        crate::inbound::http::collections::add_to_cart,
        crate::inbound::http::collections::remove_from_cart,
        crate::inbound::http::collections::download_shopping_cart,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::subscriptions::unsubscribe,
        crate::inbound::http::reference_data::list_tags,
        crate::inbound::http::reference_data::get_tag,
        crate::inbound::http::reference_data::list_ingredients,
        crate::inbound::http::reference_data::get_ingredient,
        crate::inbound::http::short_links::follow_short_link,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RecipePageSchema,
        SubscriptionPageSchema,
        RecipeRequest,
        IngredientAmountRequest,
        RecipeResponse,
        RecipeSummaryResponse,
        RecipeIngredientResponse,
        AuthorResponse,
        TagResponse,
        IngredientResponse,
        SubscriptionResponse,
        ShortLinkResponse,
    )),
    tags(
        (name = "recipes", description = "Publishing and browsing recipes"),
        (name = "collections", description = "Favorites and the shopping cart"),
        (name = "subscriptions", description = "Following authors"),
        (name = "reference-data", description = "Tags and ingredients"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
