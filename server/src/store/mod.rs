//! Storage abstraction for recipes and their ingredients.
//!
//! Every read and write goes through a [`StoreTransaction`] obtained from
//! [`RecipeStore::transaction`], so a multi-step change (for example replacing
//! a recipe's ingredients) either lands completely or not at all.

mod memory;
mod postgres;

pub use memory::MemoryRecipeStore;
pub use postgres::PgRecipeStore;

use crate::models::{Ingredient, Recipe, RecipeChanges};
use crate::recipes::query::RecipeQuery;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("recipe {0} does not exist")]
    MissingRecipe(i64),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("transaction finished without running its body")]
    BodyNotRun,
}

/// Operations available inside a single transaction.
pub trait StoreTransaction {
    /// Recipes matching `query`, most recently created (highest id) first.
    fn list_recipes(&mut self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError>;

    fn find_recipe(&mut self, id: i64) -> Result<Option<Recipe>, StoreError>;

    fn insert_recipe(&mut self, name: &str, description: &str) -> Result<Recipe, StoreError>;

    /// Applies `changes` to an existing recipe. Returns `None` if the recipe does not exist.
    fn update_recipe(
        &mut self,
        id: i64,
        changes: RecipeChanges<'_>,
    ) -> Result<Option<Recipe>, StoreError>;

    /// Ingredients owned by any of `recipe_ids`, in ascending id order.
    fn list_ingredients(&mut self, recipe_ids: &[i64]) -> Result<Vec<Ingredient>, StoreError>;

    fn insert_ingredients(
        &mut self,
        recipe_id: i64,
        names: &[String],
    ) -> Result<Vec<Ingredient>, StoreError>;

    /// Removes every ingredient owned by `recipe_id`, returning how many were removed.
    fn delete_ingredients(&mut self, recipe_id: i64) -> Result<usize, StoreError>;

    /// Removes a recipe together with all of its ingredients.
    /// Returns `false` if no recipe with that id exists.
    fn delete_recipe(&mut self, id: i64) -> Result<bool, StoreError>;
}

/// Backing store for the recipe catalog.
///
/// `transaction` commits only when `work` returns `Ok`; an error from `work`
/// (or from the commit itself) leaves the store as it was before the call.
pub trait RecipeStore: Send + Sync + fmt::Debug {
    fn transaction(
        &self,
        work: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;

    /// Short backend name for logs ("postgres", "memory").
    fn backend_name(&self) -> &'static str;
}

/// Runs `work` in a transaction on `store` and hands back its result.
pub fn run_in_transaction<T>(
    store: &dyn RecipeStore,
    mut work: impl FnMut(&mut dyn StoreTransaction) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut output = None;
    store.transaction(&mut |tx| {
        output = Some(work(tx)?);
        Ok(())
    })?;
    output.ok_or(StoreError::BodyNotRun)
}
