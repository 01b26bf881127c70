use crate::api::extract::RecipeId;
use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::types::RecipeResponse;
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(recipes): State<AppState>,
    RecipeId(id): RecipeId,
) -> Result<Json<RecipeResponse>, AppError> {
    Ok(Json(recipes.retrieve(id)?))
}
