//! Turns client payloads into checked drafts.
//!
//! All failing fields are collected so the caller can report them together.

use crate::types::{IngredientRequest, RecipeRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const MAX_NAME_LENGTH: usize = 255;

const REQUIRED: &str = "This field is required.";
const NULL: &str = "This field may not be null.";
const BLANK: &str = "This field may not be blank.";
const EMPTY_LIST: &str = "This list may not be empty.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Path of the offending field, e.g. `name` or `ingredients[2].name`
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("invalid fields: {}", .0.iter().map(|e| e.field.as_str()).collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<FieldError> {
        self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// A complete, valid recipe ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
}

/// Valid subset of recipe fields for a partial update.
///
/// `ingredients` keeps the distinction between "not sent" (`None`) and
/// "sent as an empty list" (`Some(vec![])`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

/// Validates a payload where every field is required and at least one
/// ingredient must be given. Used by create and full update.
pub fn validate_create(request: RecipeRequest) -> Result<RecipeDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required_text(&mut errors, "name", request.name, Some(MAX_NAME_LENGTH));
    let description = required_text(&mut errors, "description", request.description, None);
    let ingredients = match request.ingredients {
        None => {
            errors.push("ingredients", REQUIRED);
            Vec::new()
        }
        Some(None) => {
            errors.push("ingredients", NULL);
            Vec::new()
        }
        Some(Some(list)) if list.is_empty() => {
            errors.push("ingredients", EMPTY_LIST);
            Vec::new()
        }
        Some(Some(list)) => ingredient_names(&mut errors, list),
    };

    errors.into_result(RecipeDraft {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        ingredients,
    })
}

/// Validates only the fields present in the payload. A field sent as
/// `null` is present and rejected.
pub fn validate_patch(request: RecipeRequest) -> Result<RecipePatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = request
        .name
        .and_then(|value| non_null(&mut errors, "name", value))
        .and_then(|value| checked_text(&mut errors, "name", value, Some(MAX_NAME_LENGTH)));
    let description = request
        .description
        .and_then(|value| non_null(&mut errors, "description", value))
        .and_then(|value| checked_text(&mut errors, "description", value, None));
    let ingredients = request
        .ingredients
        .and_then(|value| non_null(&mut errors, "ingredients", value))
        .map(|list| ingredient_names(&mut errors, list));

    errors.into_result(RecipePatch {
        name,
        description,
        ingredients,
    })
}

fn non_null<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(field, NULL);
    }
    value
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Option<String>>,
    max_length: Option<usize>,
) -> Option<String> {
    match value {
        Some(value) => non_null(errors, field, value)
            .and_then(|value| checked_text(errors, field, value, max_length)),
        None => {
            errors.push(field, REQUIRED);
            None
        }
    }
}

fn checked_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: String,
    max_length: Option<usize>,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, BLANK);
        return None;
    }
    if let Some(max) = max_length {
        if trimmed.chars().count() > max {
            errors.push(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
    }
    Some(trimmed.to_string())
}

fn ingredient_names(errors: &mut ValidationErrors, list: Vec<IngredientRequest>) -> Vec<String> {
    list.into_iter()
        .enumerate()
        .filter_map(|(index, ingredient)| {
            let field = format!("ingredients[{}].name", index);
            required_text(errors, &field, ingredient.name, Some(MAX_NAME_LENGTH))
        })
        .collect()
}
