//! Assembly of HTTP handler state from repository adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use recipe_backend::domain::ports::{
    CollectionRepository, FixtureCollectionRepository, FixtureRecipeRepository,
    FixtureReferenceDataRepository, FixtureShoppingListRepository, FixtureShortLinkRepository,
    FixtureSubscriptionRepository, RecipeRepository, ReferenceDataRepository,
    ShoppingListRepository, ShortLinkRepository, SubscriptionRepository,
};
use recipe_backend::domain::{
    CollectionService, RandomTokenSource, RecipeService, ReferenceDataService,
    ShoppingListService, ShortLinkService, SubscriptionService,
};
use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_backend::outbound::persistence::{
    DbPool, DieselCollectionRepository, DieselRecipeRepository, DieselReferenceDataRepository,
    DieselShoppingListRepository, DieselShortLinkRepository, DieselSubscriptionRepository,
};
use recipe_backend::outbound::rendering::PlainTextShoppingListRenderer;

use super::ServerConfig;

/// One adapter per driven port.
struct Repositories<Rec, Col, Shop, Short, Sub, Refd> {
    recipes: Arc<Rec>,
    collections: Arc<Col>,
    shopping_list: Arc<Shop>,
    short_links: Arc<Short>,
    subscriptions: Arc<Sub>,
    reference_data: Arc<Refd>,
}

fn wire<Rec, Col, Shop, Short, Sub, Refd>(
    repos: Repositories<Rec, Col, Shop, Short, Sub, Refd>,
) -> HttpStatePorts
where
    Rec: RecipeRepository + 'static,
    Col: CollectionRepository + 'static,
    Shop: ShoppingListRepository + 'static,
    Short: ShortLinkRepository + 'static,
    Sub: SubscriptionRepository + 'static,
    Refd: ReferenceDataRepository + 'static,
{
    let recipes = Arc::new(RecipeService::new(
        repos.recipes.clone(),
        Arc::new(DefaultClock),
    ));
    HttpStatePorts {
        recipes: recipes.clone(),
        recipes_query: recipes,
        collections: Arc::new(CollectionService::new(repos.collections, repos.recipes)),
        shopping_list: Arc::new(ShoppingListService::new(
            repos.shopping_list,
            Arc::new(PlainTextShoppingListRenderer),
        )),
        short_links: Arc::new(ShortLinkService::new(
            repos.short_links,
            Arc::new(RandomTokenSource),
        )),
        subscriptions: Arc::new(SubscriptionService::new(repos.subscriptions)),
        reference_data: Arc::new(ReferenceDataService::new(repos.reference_data)),
    }
}

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    wire(Repositories {
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        collections: Arc::new(DieselCollectionRepository::new(pool.clone())),
        shopping_list: Arc::new(DieselShoppingListRepository::new(pool.clone())),
        short_links: Arc::new(DieselShortLinkRepository::new(pool.clone())),
        subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        reference_data: Arc::new(DieselReferenceDataRepository::new(pool.clone())),
    })
}

fn fixture_ports() -> HttpStatePorts {
    wire(Repositories {
        recipes: Arc::new(FixtureRecipeRepository),
        collections: Arc::new(FixtureCollectionRepository),
        shopping_list: Arc::new(FixtureShoppingListRepository),
        short_links: Arc::new(FixtureShortLinkRepository),
        subscriptions: Arc::new(FixtureSubscriptionRepository),
        reference_data: Arc::new(FixtureReferenceDataRepository),
    })
}

/// Handler state backed by Diesel when a pool is configured, fixtures
/// otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool),
        None => fixture_ports(),
    };
    web::Data::new(HttpState::new(ports, config.public_base_url.clone()))
}
