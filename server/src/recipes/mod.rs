//! Recipe catalog domain: validation, listing, ingredient reconciliation and
//! the operations exposed over HTTP.

pub mod ingredient_sync;
pub mod query;
pub mod service;
pub mod validation;

pub use query::RecipeQuery;
pub use service::RecipeService;
pub use validation::{FieldError, ValidationErrors};
