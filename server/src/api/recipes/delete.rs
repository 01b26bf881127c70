use crate::api::extract::RecipeId;
use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::AppState;
use axum::{extract::State, http::StatusCode};

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe and its ingredients deleted"),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(recipes): State<AppState>,
    RecipeId(id): RecipeId,
) -> Result<StatusCode, AppError> {
    recipes.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
