use crate::api::extract::JsonBody;
use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::types::{RecipeRequest, RecipeResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(
        content = RecipeRequest,
        description = "`name`, `description` and a non-empty `ingredients` list are required"
    ),
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(recipes): State<AppState>,
    JsonBody(request): JsonBody<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    let created = recipes.create(request)?;
    Ok((StatusCode::CREATED, Json(created)))
}
