//! Recipe aggregate: identifiers, read models and output shapes.
//!
//! Writes go through [`RecipeDraft::validate`], which produces a
//! [`ValidatedRecipe`] only when every association invariant holds. Reads
//! return a [`Recipe`] (optionally decorated with per-viewer flags as a
//! [`RecipeView`]) and are presented either in full or as a
//! [`RecipeSummary`] depending on the [`RecipeOperation`].

mod validation;

pub use validation::{
    AMOUNT_MAX, AMOUNT_MIN, COOKING_TIME_MAX, COOKING_TIME_MIN, DraftPurpose, IngredientEntry,
    RECIPE_NAME_MAX, RecipeDraft, RecipeValidationError, ValidatedRecipe,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{IngredientId, Tag, UserId, UserProfile};

/// Recipe primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Wrap an identifier read from storage or a path segment.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier for a new recipe.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Referenced ingredient.
    pub ingredient_id: IngredientId,
    /// Ingredient name at read time.
    pub name: String,
    /// Unit copied onto the junction row when the recipe was written.
    pub measurement_unit: String,
    /// Amount in `AMOUNT_MIN..=AMOUNT_MAX`.
    pub amount: i32,
}

/// Stored recipe with its associations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Primary key.
    pub id: RecipeId,
    /// Owning user.
    pub author: UserProfile,
    /// Display name.
    pub name: String,
    /// Free-text instructions.
    pub text: String,
    /// Opaque image reference.
    pub image: String,
    /// Minutes, within `COOKING_TIME_MIN..=COOKING_TIME_MAX`.
    pub cooking_time: i32,
    /// Creation timestamp used for newest-first ordering.
    pub created_at: DateTime<Utc>,
    /// Tags ordered by name.
    pub tags: Vec<Tag>,
    /// Ingredient lines ordered by ingredient name.
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Whether `user` may change or delete this recipe.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.author.id == *user
    }
}

/// Short recipe shape used by collections and subscription previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Primary key.
    pub id: RecipeId,
    /// Display name.
    pub name: String,
    /// Opaque image reference.
    pub image: String,
    /// Minutes.
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Recipe decorated with flags relative to the requesting user.
///
/// Anonymous viewers see both flags as `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    /// The recipe itself.
    pub recipe: Recipe,
    /// Whether the viewer marked the recipe as a favorite.
    pub is_favorited: bool,
    /// Whether the recipe sits in the viewer's shopping cart.
    pub is_in_shopping_cart: bool,
}

impl RecipeView {
    /// View for a viewer with no relationship to the recipe.
    #[must_use]
    pub const fn detached(recipe: Recipe) -> Self {
        Self {
            recipe,
            is_favorited: false,
            is_in_shopping_cart: false,
        }
    }

    /// Present the view in the shape `operation` calls for.
    #[must_use]
    pub fn present(self, operation: RecipeOperation) -> RecipeRepresentation {
        match operation.shape() {
            RecipeShape::Full => RecipeRepresentation::Full(Box::new(self)),
            RecipeShape::Summary => RecipeRepresentation::Summary((&self.recipe).into()),
        }
    }
}

/// Operations that return recipe data to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOperation {
    /// Paginated listing.
    List,
    /// Single-recipe retrieval.
    Retrieve,
    /// Response to a successful create.
    Create,
    /// Response to a successful update.
    Update,
    /// Response to adding a recipe to favorites.
    AddToFavorites,
    /// Response to adding a recipe to the shopping cart.
    AddToCart,
    /// Recipes previewed inside a subscription entry.
    SubscriptionPreview,
}

/// Output shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeShape {
    /// Every field, associations and viewer flags.
    Full,
    /// `{id, name, image, cooking_time}` only.
    Summary,
}

impl RecipeOperation {
    /// The shape this operation responds with.
    #[must_use]
    pub const fn shape(self) -> RecipeShape {
        match self {
            Self::List | Self::Retrieve | Self::Create | Self::Update => RecipeShape::Full,
            Self::AddToFavorites | Self::AddToCart | Self::SubscriptionPreview => {
                RecipeShape::Summary
            }
        }
    }
}

/// A recipe rendered for a particular operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeRepresentation {
    /// Full recipe with viewer flags.
    Full(Box<RecipeView>),
    /// Short shape.
    Summary(RecipeSummary),
}

/// Listing filters. Empty `tag_slugs` means no tag filter; otherwise a
/// recipe matches when it carries any of the slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Restrict to one author.
    pub author: Option<UserId>,
    /// Restrict to recipes carrying any of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Restrict to the given user's favorites.
    pub favorited_by: Option<UserId>,
    /// Restrict to the given user's shopping cart.
    pub in_cart_of: Option<UserId>,
}
