//! HTTP inbound adapter exposing the recipe REST API.
//!
//! [`configure_api`] registers every `/api/v1` handler; the server mounts
//! it under a scope. The short-link redirect and health probes live outside
//! that scope.

pub mod collections;
pub mod error;
pub mod health;
pub(crate) mod query;
pub mod recipe_dto;
pub mod recipes;
pub mod reference_data;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod short_links;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api/v1` handlers on `cfg`.
///
/// `download_shopping_cart` is registered before `/recipes/{id}` so the
/// literal segment is not captured as a recipe id.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(collections::download_shopping_cart)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::get_short_link)
        .service(collections::add_favorite)
        .service(collections::remove_favorite)
        .service(collections::add_to_cart)
        .service(collections::remove_from_cart)
        .service(subscriptions::list_subscriptions)
        .service(subscriptions::subscribe)
        .service(subscriptions::unsubscribe)
        .service(reference_data::list_tags)
        .service(reference_data::get_tag)
        .service(reference_data::list_ingredients)
        .service(reference_data::get_ingredient);
}
