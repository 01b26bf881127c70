//! Keeps a recipe's stored ingredients in line with the names a client sent.
//!
//! Ingredients have no identity a client can refer to, so reconciliation is
//! all-or-nothing: either the stored set is left alone or it is deleted and
//! recreated from the incoming names. Callers run this inside the same store
//! transaction as the recipe write.

use crate::models::Ingredient;
use crate::store::{StoreError, StoreTransaction};

/// What an update does to the stored ingredient set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientSync<'a> {
    Keep,
    Replace(&'a [String]),
}

impl<'a> IngredientSync<'a> {
    /// Policy for a partial update: only a non-empty list replaces the
    /// stored set. A missing list and an empty list both keep it.
    pub fn for_update(ingredients: Option<&'a [String]>) -> Self {
        match ingredients {
            Some(names) if !names.is_empty() => IngredientSync::Replace(names),
            _ => IngredientSync::Keep,
        }
    }

    /// Applies the policy and returns the recipe's ingredients afterwards.
    pub fn apply(
        self,
        tx: &mut dyn StoreTransaction,
        recipe_id: i64,
    ) -> Result<Vec<Ingredient>, StoreError> {
        match self {
            IngredientSync::Keep => tx.list_ingredients(&[recipe_id]),
            IngredientSync::Replace(names) => {
                let removed = tx.delete_ingredients(recipe_id)?;
                tracing::debug!(recipe_id, removed, added = names.len(), "replacing ingredients");
                tx.insert_ingredients(recipe_id, names)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{run_in_transaction, MemoryRecipeStore};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn stored_recipe(store: &MemoryRecipeStore, ingredients: &[&str]) -> (i64, Vec<Ingredient>) {
        run_in_transaction(store, |tx| {
            let recipe = tx.insert_recipe("Pizza", "Put it in the oven")?;
            let created = tx.insert_ingredients(recipe.id, &names(ingredients))?;
            Ok((recipe.id, created))
        })
        .unwrap()
    }

    #[test]
    fn test_policy_for_update() {
        let list = names(&["dough"]);
        let empty: Vec<String> = Vec::new();
        assert_eq!(IngredientSync::for_update(None), IngredientSync::Keep);
        assert_eq!(IngredientSync::for_update(Some(empty.as_slice())), IngredientSync::Keep);
        assert_eq!(
            IngredientSync::for_update(Some(list.as_slice())),
            IngredientSync::Replace(&list)
        );
    }

    #[test]
    fn test_repeated_names_get_separate_rows() {
        let store = MemoryRecipeStore::new();
        let (_, created) = stored_recipe(&store, &["salt", "salt", "pepper"]);
        assert_eq!(created.len(), 3);
        assert_eq!(created[0].name, "salt");
        assert_eq!(created[1].name, "salt");
    }

    #[test]
    fn test_keep_leaves_ingredients_untouched() {
        let store = MemoryRecipeStore::new();
        let (recipe_id, created) = stored_recipe(&store, &["dough", "cheese"]);

        let after = run_in_transaction(&store, |tx| IngredientSync::Keep.apply(tx, recipe_id))
            .unwrap();
        assert_eq!(after, created);
    }

    #[test]
    fn test_replace_swaps_whole_set_with_new_ids() {
        let store = MemoryRecipeStore::new();
        let (recipe_id, created) = stored_recipe(&store, &["dough", "cheese", "tomato"]);
        let replacement = names(&["flour", "water"]);

        let after = run_in_transaction(&store, |tx| {
            IngredientSync::Replace(&replacement).apply(tx, recipe_id)
        })
        .unwrap();

        let after_names: Vec<&str> = after.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(after_names, vec!["flour", "water"]);
        for old in &created {
            assert!(after.iter().all(|new| new.id != old.id));
        }
    }

    #[test]
    fn test_replace_for_missing_recipe_changes_nothing() {
        let store = MemoryRecipeStore::new();
        let (recipe_id, created) = stored_recipe(&store, &["dough"]);
        let replacement = names(&["flour"]);

        let result = run_in_transaction(&store, |tx| {
            IngredientSync::Replace(&replacement).apply(tx, recipe_id + 100)
        });
        assert!(result.is_err());

        let still = run_in_transaction(&store, |tx| tx.list_ingredients(&[recipe_id])).unwrap();
        assert_eq!(still, created);
    }
}
