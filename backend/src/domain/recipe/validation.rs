//! Recipe draft validation.
//!
//! Every check runs before any write. A draft that fails produces exactly one
//! [`RecipeValidationError`] naming the offending field.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{IngredientId, TagId};

/// Smallest accepted ingredient amount.
pub const AMOUNT_MIN: i32 = 1;
/// Largest accepted ingredient amount.
pub const AMOUNT_MAX: i32 = 1000;
/// Shortest accepted cooking time in minutes.
pub const COOKING_TIME_MIN: i32 = 1;
/// Longest accepted cooking time in minutes (one day).
pub const COOKING_TIME_MAX: i32 = 1440;
/// Maximum recipe name length in characters.
pub const RECIPE_NAME_MAX: usize = 256;

/// Ingredient reference with the amount requested by the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    /// Referenced ingredient.
    pub ingredient_id: IngredientId,
    /// Amount in the ingredient's measurement unit.
    pub amount: i32,
}

/// Whether a draft creates a recipe or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPurpose {
    /// New recipe; an image is mandatory.
    Create,
    /// Replacement; omitting the image keeps the stored one.
    Update,
}

/// Unvalidated recipe input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Display name.
    pub name: String,
    /// Free-text instructions.
    pub text: String,
    /// Opaque image reference.
    pub image: Option<String>,
    /// Minutes.
    pub cooking_time: i32,
    /// Selected tags.
    pub tags: Vec<TagId>,
    /// Selected ingredients with amounts.
    pub ingredients: Vec<IngredientEntry>,
}

/// Validation failures, one per rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeValidationError {
    /// Blank name.
    #[error("name must not be empty")]
    EmptyName,
    /// Name longer than [`RECIPE_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Allowed length.
        max: usize,
    },
    /// Blank instructions.
    #[error("text must not be empty")]
    EmptyText,
    /// Cooking time outside the accepted range.
    #[error("cooking time must be between 1 and 1440 minutes")]
    CookingTimeOutOfRange {
        /// Rejected value.
        value: i32,
    },
    /// Create without an image.
    #[error("image is required")]
    MissingImage,
    /// No tags selected.
    #[error("no tag selected")]
    NoTags,
    /// A tag appears twice.
    #[error("duplicate tags")]
    DuplicateTags {
        /// First repeated tag.
        id: TagId,
    },
    /// No ingredients selected.
    #[error("no ingredient selected")]
    NoIngredients,
    /// An ingredient appears twice.
    #[error("duplicate ingredient")]
    DuplicateIngredient {
        /// First repeated ingredient.
        id: IngredientId,
    },
    /// Amount outside [`AMOUNT_MIN`]..=[`AMOUNT_MAX`].
    #[error("amount must be between 1 and 1000")]
    AmountOutOfRange {
        /// Ingredient carrying the amount.
        ingredient_id: IngredientId,
        /// Rejected amount.
        amount: i32,
    },
}

impl RecipeValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::MissingImage => "image",
            Self::NoTags | Self::DuplicateTags { .. } => "tags",
            Self::NoIngredients
            | Self::DuplicateIngredient { .. }
            | Self::AmountOutOfRange { .. } => "ingredients",
        }
    }

    /// Machine-readable rule identifier.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::EmptyText => "empty_text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time_out_of_range",
            Self::MissingImage => "missing_image",
            Self::NoTags => "no_tags",
            Self::DuplicateTags { .. } => "duplicate_tags",
            Self::NoIngredients => "no_ingredients",
            Self::DuplicateIngredient { .. } => "duplicate_ingredient",
            Self::AmountOutOfRange { .. } => "amount_out_of_range",
        }
    }
}

/// Draft that passed every rule. Only [`RecipeDraft::validate`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    name: String,
    text: String,
    image: Option<String>,
    cooking_time: i32,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientEntry>,
}

impl ValidatedRecipe {
    /// Trimmed display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instructions.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Image reference; always present for [`DraftPurpose::Create`].
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Minutes.
    #[must_use]
    pub const fn cooking_time(&self) -> i32 {
        self.cooking_time
    }

    /// Distinct, non-empty tag set.
    #[must_use]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Distinct, non-empty ingredient entries with in-range amounts.
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientEntry] {
        &self.ingredients
    }

    /// Referenced ingredient identifiers.
    #[must_use]
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients.iter().map(|e| e.ingredient_id).collect()
    }
}

fn first_duplicate<T, I>(items: I) -> Option<T>
where
    T: Copy + Eq + std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items.into_iter().find(|item| !seen.insert(*item))
}

impl RecipeDraft {
    /// Check every rule, returning the first violation.
    ///
    /// # Errors
    /// Returns the [`RecipeValidationError`] for the first rule the draft
    /// breaks, checking scalar fields first and associations last.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{
    ///     DraftPurpose, IngredientEntry, IngredientId, RecipeDraft, RecipeValidationError, TagId,
    /// };
    ///
    /// let draft = RecipeDraft {
    ///     name: "Pancakes".into(),
    ///     text: "Mix and fry.".into(),
    ///     image: Some("pancakes.png".into()),
    ///     cooking_time: 20,
    ///     tags: vec![TagId(1), TagId(1)],
    ///     ingredients: vec![IngredientEntry { ingredient_id: IngredientId(7), amount: 200 }],
    /// };
    /// assert_eq!(
    ///     draft.validate(DraftPurpose::Create),
    ///     Err(RecipeValidationError::DuplicateTags { id: TagId(1) })
    /// );
    /// ```
    pub fn validate(self, purpose: DraftPurpose) -> Result<ValidatedRecipe, RecipeValidationError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        if self.text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        if !(COOKING_TIME_MIN..=COOKING_TIME_MAX).contains(&self.cooking_time) {
            return Err(RecipeValidationError::CookingTimeOutOfRange {
                value: self.cooking_time,
            });
        }
        let image = self.image.filter(|image| !image.trim().is_empty());
        if purpose == DraftPurpose::Create && image.is_none() {
            return Err(RecipeValidationError::MissingImage);
        }

        if self.tags.is_empty() {
            return Err(RecipeValidationError::NoTags);
        }
        if let Some(id) = first_duplicate(self.tags.iter().copied()) {
            return Err(RecipeValidationError::DuplicateTags { id });
        }

        if self.ingredients.is_empty() {
            return Err(RecipeValidationError::NoIngredients);
        }
        if let Some(id) = first_duplicate(self.ingredients.iter().map(|e| e.ingredient_id)) {
            return Err(RecipeValidationError::DuplicateIngredient { id });
        }
        if let Some(entry) = self
            .ingredients
            .iter()
            .find(|e| !(AMOUNT_MIN..=AMOUNT_MAX).contains(&e.amount))
        {
            return Err(RecipeValidationError::AmountOutOfRange {
                ingredient_id: entry.ingredient_id,
                amount: entry.amount,
            });
        }

        Ok(ValidatedRecipe {
            name,
            text: self.text,
            image,
            cooking_time: self.cooking_time,
            tags: self.tags,
            ingredients: self.ingredients,
        })
    }
}
