//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ShoppingListRenderer`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_command;
mod collection_repository;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod reference_data_query;
mod reference_data_repository;
mod shopping_list_query;
mod shopping_list_renderer;
mod shopping_list_repository;
mod short_link_command;
mod short_link_repository;
mod subscription_command;
mod subscription_repository;

pub use collection_command::CollectionCommand;
#[cfg(test)]
pub use collection_command::MockCollectionCommand;
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{
    CollectionRepository, CollectionRepositoryError, FixtureCollectionRepository,
};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::{RecipeListRequest, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{
    FixtureRecipeRepository, NewRecipe, RecipePage, RecipeRepository, RecipeRepositoryError,
    RecipeUpdate,
};
#[cfg(test)]
pub use reference_data_query::MockReferenceDataQuery;
pub use reference_data_query::ReferenceDataQuery;
#[cfg(test)]
pub use reference_data_repository::MockReferenceDataRepository;
pub use reference_data_repository::{
    FixtureReferenceDataRepository, ReferenceDataRepository, ReferenceDataRepositoryError,
};
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use shopping_list_renderer::MockShoppingListRenderer;
pub use shopping_list_renderer::{
    ShoppingListDocument, ShoppingListRenderError, ShoppingListRenderer, ShoppingListTemplate,
};
#[cfg(test)]
pub use shopping_list_repository::MockShoppingListRepository;
pub use shopping_list_repository::{
    FixtureShoppingListRepository, ShoppingListRepository, ShoppingListRepositoryError,
};
#[cfg(test)]
pub use short_link_command::MockShortLinkCommand;
pub use short_link_command::ShortLinkCommand;
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
pub use short_link_repository::{
    AssignTokenOutcome, FixtureShortLinkRepository, RecipeTokenState, ShortLinkRepository,
    ShortLinkRepositoryError,
};
#[cfg(test)]
pub use subscription_command::MockSubscriptionCommand;
pub use subscription_command::SubscriptionCommand;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{
    FixtureSubscriptionRepository, SubscriptionPage, SubscriptionRepository,
    SubscriptionRepositoryError,
};
