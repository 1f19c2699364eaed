//! Request and response bodies shared by the recipe, collection and
//! subscription handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Ingredient, IngredientEntry, IngredientId, RecipeDraft, RecipeRepresentation,
    RecipeSummary, RecipeView, SubscriptionView, Tag, TagId, UserProfile,
};
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// One ingredient line of a create or update request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient id.
    #[schema(example = 1)]
    pub id: Option<i64>,
    /// Amount in the ingredient's unit, 1 to 1000.
    #[schema(example = 200)]
    pub amount: Option<i32>,
}

/// Body of `POST /api/v1/recipes` and `PATCH /api/v1/recipes/{id}`.
///
/// Example JSON:
/// `{"name":"Pancakes","text":"Mix and fry.","image":"pancakes.png","cooking_time":20,"tags":[1],"ingredients":[{"id":1,"amount":200}]}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    /// Opaque image reference. Required on create; omitted on update keeps
    /// the stored image.
    pub image: Option<String>,
    /// Minutes, 1 to 1440.
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = Error;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        let ingredients = value
            .ingredients
            .ok_or_else(|| missing_field_error(FieldName::new("ingredients")))?
            .into_iter()
            .map(|line| match (line.id, line.amount) {
                (Some(id), Some(amount)) => Ok(IngredientEntry {
                    ingredient_id: IngredientId(id),
                    amount,
                }),
                (None, _) => Err(missing_field_error(FieldName::new("ingredients.id"))),
                (_, None) => Err(missing_field_error(FieldName::new("ingredients.amount"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: value
                .name
                .ok_or_else(|| missing_field_error(FieldName::new("name")))?,
            text: value
                .text
                .ok_or_else(|| missing_field_error(FieldName::new("text")))?,
            image: value.image,
            cooking_time: value
                .cooking_time
                .ok_or_else(|| missing_field_error(FieldName::new("cooking_time")))?,
            tags: value
                .tags
                .ok_or_else(|| missing_field_error(FieldName::new("tags")))?
                .into_iter()
                .map(TagId)
                .collect(),
            ingredients,
        })
    }
}

/// Public author fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
}

impl From<UserProfile> for AuthorResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
        }
    }
}

/// Tag as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id.0,
            name: value.name,
            slug: value.slug,
        }
    }
}

/// Ingredient reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i64,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id.0,
            name: value.name,
            measurement_unit: value.measurement_unit,
        }
    }
}

/// Ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: String,
    pub author: AuthorResponse,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl From<RecipeView> for RecipeResponse {
    fn from(value: RecipeView) -> Self {
        let RecipeView {
            recipe,
            is_favorited,
            is_in_shopping_cart,
        } = value;
        Self {
            id: recipe.id.to_string(),
            author: recipe.author.into(),
            name: recipe.name,
            text: recipe.text,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
            created_at: recipe.created_at.to_rfc3339(),
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse {
                    id: line.ingredient_id.0,
                    name: line.name,
                    measurement_unit: line.measurement_unit,
                    amount: line.amount,
                })
                .collect(),
            is_favorited,
            is_in_shopping_cart,
        }
    }
}

/// Short recipe shape: `{id, name, image, cooking_time}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(value: RecipeSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            image: value.image,
            cooking_time: value.cooking_time,
        }
    }
}

/// A recipe serialised in whichever shape its operation calls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecipePayload {
    Full(Box<RecipeResponse>),
    Summary(RecipeSummaryResponse),
}

impl From<RecipeRepresentation> for RecipePayload {
    fn from(value: RecipeRepresentation) -> Self {
        match value {
            RecipeRepresentation::Full(view) => Self::Full(Box::new((*view).into())),
            RecipeRepresentation::Summary(summary) => Self::Summary(summary.into()),
        }
    }
}

/// Followed author with their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: String,
    pub username: String,
    /// Always true: the entry exists because the viewer follows the author.
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(value: SubscriptionView) -> Self {
        Self {
            id: value.author.id.to_string(),
            username: value.author.username,
            is_subscribed: true,
            recipes: value
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: value.recipes_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Recipe, RecipeId, RecipeIngredient, RecipeOperation, UserId,
    };
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    fn view() -> RecipeView {
        RecipeView {
            recipe: Recipe {
                id: RecipeId::from_uuid(uuid::Uuid::nil()),
                author: UserProfile {
                    id: UserId::from_uuid(uuid::Uuid::nil()),
                    username: "ada".to_owned(),
                },
                name: "Pancakes".to_owned(),
                text: "Mix and fry.".to_owned(),
                image: "pancakes.png".to_owned(),
                cooking_time: 20,
                created_at: Utc
                    .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
                    .single()
                    .expect("valid timestamp"),
                tags: vec![Tag {
                    id: TagId(1),
                    name: "Breakfast".to_owned(),
                    slug: "breakfast".to_owned(),
                }],
                ingredients: vec![RecipeIngredient {
                    ingredient_id: IngredientId(7),
                    name: "flour".to_owned(),
                    measurement_unit: "g".to_owned(),
                    amount: 200,
                }],
            },
            is_favorited: true,
            is_in_shopping_cart: false,
        }
    }

    fn request() -> RecipeRequest {
        RecipeRequest {
            name: Some("Pancakes".to_owned()),
            text: Some("Mix and fry.".to_owned()),
            image: None,
            cooking_time: Some(20),
            tags: Some(vec![1, 2]),
            ingredients: Some(vec![IngredientAmountRequest {
                id: Some(7),
                amount: Some(200),
            }]),
        }
    }

    #[rstest]
    fn request_converts_to_draft() {
        let draft = RecipeDraft::try_from(request()).expect("complete request");
        assert_eq!(draft.tags, vec![TagId(1), TagId(2)]);
        assert_eq!(
            draft.ingredients,
            vec![IngredientEntry {
                ingredient_id: IngredientId(7),
                amount: 200
            }]
        );
        assert_eq!(draft.image, None);
    }

    #[rstest]
    #[case::name(RecipeRequest { name: None, ..request() }, "name")]
    #[case::tags(RecipeRequest { tags: None, ..request() }, "tags")]
    #[case::ingredients(RecipeRequest { ingredients: None, ..request() }, "ingredients")]
    #[case::amount(
        RecipeRequest {
            ingredients: Some(vec![IngredientAmountRequest { id: Some(7), amount: None }]),
            ..request()
        },
        "ingredients.amount"
    )]
    fn missing_fields_are_named(#[case] body: RecipeRequest, #[case] field: &str) {
        let err = RecipeDraft::try_from(body).expect_err("incomplete request");
        let named = err
            .details()
            .and_then(|details| details.get("field"))
            .and_then(|value| value.as_str());
        assert_eq!(named, Some(field));
    }

    #[rstest]
    fn full_shape_serialises_every_field() {
        let payload = RecipePayload::from(view().present(RecipeOperation::Retrieve));
        let value = serde_json::to_value(payload).expect("serialise recipe");
        assert_eq!(value["author"]["username"], json!("ada"));
        assert_eq!(value["tags"][0]["slug"], json!("breakfast"));
        assert_eq!(value["ingredients"][0]["amount"], json!(200));
        assert_eq!(value["is_favorited"], json!(true));
        assert_eq!(value["created_at"], json!("2024-03-01T12:00:00+00:00"));
    }

    #[rstest]
    fn summary_shape_has_four_fields() {
        let payload = RecipePayload::from(view().present(RecipeOperation::AddToCart));
        let value = serde_json::to_value(payload).expect("serialise summary");
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Pancakes",
                "image": "pancakes.png",
                "cooking_time": 20,
            })
        );
    }
}
