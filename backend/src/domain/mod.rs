//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed recipe entities and the use-case services
//! that operate on them. Services depend only on the ports in [`ports`];
//! adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`Recipe`], [`RecipeDraft`] and friends: the recipe aggregate.
//! - [`ShoppingList`]: aggregated cart ingredients.
//! - Services: [`RecipeService`], [`CollectionService`],
//!   [`ShoppingListService`], [`ShortLinkService`], [`SubscriptionService`]
//!   and [`ReferenceDataService`].

pub mod collection;
pub mod error;
pub mod paging;
pub mod ports;
pub mod recipe;
pub mod reference_data;
pub mod shopping_list;
pub mod short_link;
pub mod subscription;
pub mod trace_id;
pub mod user;

mod collection_service;
mod recipe_service;
mod reference_data_service;
mod shopping_list_service;
mod short_link_service;
mod subscription_service;

pub use self::collection::CollectionKind;
pub use self::collection_service::CollectionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::paging::Paged;
pub use self::recipe::{
    AMOUNT_MAX, AMOUNT_MIN, COOKING_TIME_MAX, COOKING_TIME_MIN, DraftPurpose, IngredientEntry,
    RECIPE_NAME_MAX, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredient,
    RecipeOperation, RecipeRepresentation, RecipeShape, RecipeSummary, RecipeValidationError,
    RecipeView, ValidatedRecipe,
};
pub use self::recipe_service::RecipeService;
pub use self::reference_data::{
    ImportReport, Ingredient, IngredientId, NewIngredient, NewTag, ReferenceDataError, Tag, TagId,
    parse_ingredients_csv, parse_tags_csv,
};
pub use self::reference_data_service::ReferenceDataService;
pub use self::shopping_list::{CartIngredientLine, ShoppingList, ShoppingListItem};
pub use self::shopping_list_service::ShoppingListService;
pub use self::short_link::{
    RandomTokenSource, SHORT_LINK_SIZE, ShortLinkToken, ShortLinkTokenError, ShortLinkTokenSource,
};
pub use self::short_link_service::{MAX_TOKEN_ATTEMPTS, ShortLinkService};
pub use self::subscription::{
    DEFAULT_RECIPES_LIMIT, Subscription, SubscriptionError, SubscriptionView,
};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn guarded() -> ApiResult<()> {
///     Err(Error::forbidden("only the author can modify this recipe"))
/// }
///
/// assert!(guarded().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
