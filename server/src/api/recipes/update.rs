use crate::api::extract::{JsonBody, RecipeId};
use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::types::{RecipeRequest, RecipeResponse};
use crate::AppState;
use axum::{extract::State, Json};

/// Partial update: only the supplied fields change.
///
/// A non-empty `ingredients` list replaces the recipe's ingredients; an
/// empty or missing list leaves them as they are.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(recipes): State<AppState>,
    RecipeId(id): RecipeId,
    JsonBody(request): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    Ok(Json(recipes.update(id, request)?))
}

/// Full update: all fields are required and the ingredients are replaced.
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn replace_recipe(
    State(recipes): State<AppState>,
    RecipeId(id): RecipeId,
    JsonBody(request): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    Ok(Json(recipes.replace(id, request)?))
}
