//! In-process store used by tests and by `RECIPE_STORE=memory`.

use super::{RecipeStore, StoreError, StoreTransaction};
use crate::models::{Ingredient, Recipe, RecipeChanges};
use crate::recipes::query::RecipeQuery;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct MemoryState {
    recipes: BTreeMap<i64, Recipe>,
    ingredients: BTreeMap<i64, Ingredient>,
    next_recipe_id: i64,
    next_ingredient_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            recipes: BTreeMap::new(),
            ingredients: BTreeMap::new(),
            next_recipe_id: 1,
            next_ingredient_id: 1,
        }
    }
}

/// Stores recipes in memory behind a mutex.
///
/// A transaction snapshots the state before its first write and restores
/// the snapshot if the unit of work fails. Read-only transactions never
/// copy. Ids are never reused.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn transaction(
        &self,
        work: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        let mut tx = MemoryTransaction::new(&mut state);
        let result = work(&mut tx);
        if result.is_err() {
            tx.rollback();
        }
        result
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryTransaction<'s> {
    state: &'s mut MemoryState,
    snapshot: Option<MemoryState>,
}

impl<'s> MemoryTransaction<'s> {
    fn new(state: &'s mut MemoryState) -> Self {
        Self {
            state,
            snapshot: None,
        }
    }

    /// Mutable access to the state, taking a snapshot on first use.
    fn write(&mut self) -> &mut MemoryState {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.state.clone());
        }
        &mut *self.state
    }

    fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.state = snapshot;
        }
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn list_recipes(&mut self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        Ok(self
            .state
            .recipes
            .values()
            .rev()
            .filter(|recipe| query.matches(recipe))
            .cloned()
            .collect())
    }

    fn find_recipe(&mut self, id: i64) -> Result<Option<Recipe>, StoreError> {
        Ok(self.state.recipes.get(&id).cloned())
    }

    fn insert_recipe(&mut self, name: &str, description: &str) -> Result<Recipe, StoreError> {
        let state = self.write();
        let recipe = Recipe {
            id: state.next_recipe_id,
            name: name.to_string(),
            description: description.to_string(),
        };
        state.next_recipe_id += 1;
        state.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    fn update_recipe(
        &mut self,
        id: i64,
        changes: RecipeChanges<'_>,
    ) -> Result<Option<Recipe>, StoreError> {
        if !self.state.recipes.contains_key(&id) {
            return Ok(None);
        }
        if changes.is_empty() {
            return self.find_recipe(id);
        }

        let Some(recipe) = self.write().recipes.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            recipe.name = name.to_string();
        }
        if let Some(description) = changes.description {
            recipe.description = description.to_string();
        }
        Ok(Some(recipe.clone()))
    }

    fn list_ingredients(&mut self, recipe_ids: &[i64]) -> Result<Vec<Ingredient>, StoreError> {
        Ok(self
            .state
            .ingredients
            .values()
            .filter(|ingredient| recipe_ids.contains(&ingredient.recipe_id))
            .cloned()
            .collect())
    }

    fn insert_ingredients(
        &mut self,
        recipe_id: i64,
        names: &[String],
    ) -> Result<Vec<Ingredient>, StoreError> {
        if !self.state.recipes.contains_key(&recipe_id) {
            return Err(StoreError::MissingRecipe(recipe_id));
        }
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.write();
        let mut inserted = Vec::with_capacity(names.len());
        for name in names {
            let ingredient = Ingredient {
                id: state.next_ingredient_id,
                recipe_id,
                name: name.clone(),
            };
            state.next_ingredient_id += 1;
            state.ingredients.insert(ingredient.id, ingredient.clone());
            inserted.push(ingredient);
        }
        Ok(inserted)
    }

    fn delete_ingredients(&mut self, recipe_id: i64) -> Result<usize, StoreError> {
        let owned = self
            .state
            .ingredients
            .values()
            .filter(|ingredient| ingredient.recipe_id == recipe_id)
            .count();
        if owned == 0 {
            return Ok(0);
        }

        self.write()
            .ingredients
            .retain(|_, ingredient| ingredient.recipe_id != recipe_id);
        Ok(owned)
    }

    fn delete_recipe(&mut self, id: i64) -> Result<bool, StoreError> {
        if !self.state.recipes.contains_key(&id) {
            return Ok(false);
        }
        self.delete_ingredients(id)?;
        self.write().recipes.remove(&id);
        Ok(true)
    }
}
