use crate::models::{Ingredient, Recipe};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Ingredient as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IngredientRequest {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
}

/// Recipe payload shared by create, full update and partial update.
///
/// Every field is optional on the wire so that a missing field can be
/// reported as a validation error instead of a deserialization failure.
/// The outer `Option` says whether the key was sent at all, the inner one
/// whether it was `null`. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RecipeRequest {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Vec<IngredientRequest>>)]
    pub ingredients: Option<Option<Vec<IngredientRequest>>>,
}

/// Marks a key that appeared in the payload, keeping an explicit `null`
/// as `Some(None)`. Absent keys fall back to `None` via `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub name: String,
}

/// Representation returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<IngredientResponse>,
}

impl RecipeResponse {
    pub fn new(recipe: Recipe, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            description: recipe.description,
            ingredients: ingredients
                .into_iter()
                .map(|i| IngredientResponse { name: i.name })
                .collect(),
        }
    }
}
