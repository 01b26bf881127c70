use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::recipes::RecipeQuery;
use crate::types::RecipeResponse;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use utoipa::IntoParams;

#[derive(Debug, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// Only return recipes whose name contains this text (case-sensitive).
    /// Empty means no filter. If given more than once, the last value wins.
    pub name: Option<String>,
}

impl ListRecipesParams {
    /// Builds the params from raw query pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .filter(|(key, _)| key == "name")
            .map(|(_, value)| value)
            .last();
        Self { name }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, most recently created first", body = Vec<RecipeResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(recipes): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let params = ListRecipesParams::from_pairs(pairs);
    let query = RecipeQuery::new(params.name);
    Ok(Json(recipes.list(&query)?))
}
