//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on driving ports,
//! so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CollectionCommand, RecipeCommand, RecipeQuery, ReferenceDataQuery, ShoppingListQuery,
    ShortLinkCommand, SubscriptionCommand,
};

/// Parameter object bundling every port implementation.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub collections: Arc<dyn CollectionCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub short_links: Arc<dyn ShortLinkCommand>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub reference_data: Arc<dyn ReferenceDataQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub collections: Arc<dyn CollectionCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub short_links: Arc<dyn ShortLinkCommand>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub reference_data: Arc<dyn ReferenceDataQuery>,
    /// Externally visible origin, without a trailing slash. Used for short
    /// links, redirects and pagination links.
    pub public_base_url: String,
}

impl HttpState {
    /// Construct state from the port bundle and the public base URL.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipe_backend::domain::ports::{
    ///     FixtureCollectionRepository, FixtureRecipeRepository, FixtureReferenceDataRepository,
    ///     FixtureShoppingListRepository, FixtureShortLinkRepository,
    ///     FixtureSubscriptionRepository,
    /// };
    /// use recipe_backend::domain::{
    ///     CollectionService, RandomTokenSource, RecipeService, ReferenceDataService,
    ///     ShoppingListService, ShortLinkService, SubscriptionService,
    /// };
    /// use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use recipe_backend::outbound::rendering::PlainTextShoppingListRenderer;
    ///
    /// let recipes = Arc::new(RecipeService::new(
    ///     Arc::new(FixtureRecipeRepository),
    ///     Arc::new(mockable::DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         recipes: recipes.clone(),
    ///         recipes_query: recipes,
    ///         collections: Arc::new(CollectionService::new(
    ///             Arc::new(FixtureCollectionRepository),
    ///             Arc::new(FixtureRecipeRepository),
    ///         )),
    ///         shopping_list: Arc::new(ShoppingListService::new(
    ///             Arc::new(FixtureShoppingListRepository),
    ///             Arc::new(PlainTextShoppingListRenderer),
    ///         )),
    ///         short_links: Arc::new(ShortLinkService::new(
    ///             Arc::new(FixtureShortLinkRepository),
    ///             Arc::new(RandomTokenSource),
    ///         )),
    ///         subscriptions: Arc::new(SubscriptionService::new(Arc::new(
    ///             FixtureSubscriptionRepository,
    ///         ))),
    ///         reference_data: Arc::new(ReferenceDataService::new(Arc::new(
    ///             FixtureReferenceDataRepository,
    ///         ))),
    ///     },
    ///     "http://localhost:8080/",
    /// );
    /// assert_eq!(state.public_base_url, "http://localhost:8080");
    /// ```
    pub fn new(ports: HttpStatePorts, public_base_url: impl Into<String>) -> Self {
        let HttpStatePorts {
            recipes,
            recipes_query,
            collections,
            shopping_list,
            short_links,
            subscriptions,
            reference_data,
        } = ports;
        let public_base_url = public_base_url.into().trim_end_matches('/').to_owned();
        Self {
            recipes,
            recipes_query,
            collections,
            shopping_list,
            short_links,
            subscriptions,
            reference_data,
            public_base_url,
        }
    }
}
