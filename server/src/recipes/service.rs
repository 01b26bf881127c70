use super::ingredient_sync::IngredientSync;
use super::query::RecipeQuery;
use super::validation::{validate_create, validate_patch};
use crate::error::AppError;
use crate::models::{Ingredient, Recipe, RecipeChanges};
use crate::store::{run_in_transaction, RecipeStore};
use crate::types::{RecipeRequest, RecipeResponse};
use std::collections::HashMap;
use std::sync::Arc;

/// The recipe catalog's operations, independent of HTTP.
///
/// Every operation runs in one store transaction, so a failure part way
/// through (for example while replacing ingredients) leaves no partial write.
#[derive(Debug, Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Recipes matching `query`, newest first, each with its ingredients.
    pub fn list(&self, query: &RecipeQuery) -> Result<Vec<RecipeResponse>, AppError> {
        let recipes = run_in_transaction(self.store.as_ref(), |tx| {
            let recipes = tx.list_recipes(query)?;
            let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
            let ingredients = tx.list_ingredients(&ids)?;
            Ok(with_ingredients(recipes, ingredients))
        })?;

        tracing::debug!(filter = ?query.name(), count = recipes.len(), "listed recipes");
        Ok(recipes)
    }

    pub fn retrieve(&self, id: i64) -> Result<RecipeResponse, AppError> {
        run_in_transaction(self.store.as_ref(), |tx| {
            let Some(recipe) = tx.find_recipe(id)? else {
                return Ok(None);
            };
            let ingredients = tx.list_ingredients(&[recipe.id])?;
            Ok(Some(RecipeResponse::new(recipe, ingredients)))
        })?
        .ok_or(AppError::NotFound)
    }

    /// Stores a new recipe with at least one ingredient.
    pub fn create(&self, request: RecipeRequest) -> Result<RecipeResponse, AppError> {
        let draft = validate_create(request)?;

        let created = run_in_transaction(self.store.as_ref(), |tx| {
            let recipe = tx.insert_recipe(&draft.name, &draft.description)?;
            let ingredients = tx.insert_ingredients(recipe.id, &draft.ingredients)?;
            Ok(RecipeResponse::new(recipe, ingredients))
        })?;

        tracing::info!(
            recipe_id = created.id,
            ingredients = created.ingredients.len(),
            "created recipe"
        );
        Ok(created)
    }

    /// Partial update. Only supplied fields change; a supplied ingredient
    /// list replaces the stored one unless it is empty, in which case the
    /// stored ingredients are kept.
    pub fn update(&self, id: i64, request: RecipeRequest) -> Result<RecipeResponse, AppError> {
        // A missing recipe is reported before any problem with the payload.
        self.ensure_exists(id)?;
        let patch = validate_patch(request)?;

        let changes = RecipeChanges {
            name: patch.name.as_deref(),
            description: patch.description.as_deref(),
        };
        let sync = IngredientSync::for_update(patch.ingredients.as_deref());

        let updated = self.write_recipe(id, changes, sync)?;
        tracing::info!(
            recipe_id = id,
            replaced_ingredients = matches!(sync, IngredientSync::Replace(_)),
            "updated recipe"
        );
        Ok(updated)
    }

    /// Full update: every field is required and the ingredient set is
    /// always replaced.
    pub fn replace(&self, id: i64, request: RecipeRequest) -> Result<RecipeResponse, AppError> {
        self.ensure_exists(id)?;
        let draft = validate_create(request)?;

        let changes = RecipeChanges {
            name: Some(draft.name.as_str()),
            description: Some(draft.description.as_str()),
        };
        let updated = self.write_recipe(id, changes, IngredientSync::Replace(&draft.ingredients))?;
        tracing::info!(recipe_id = id, "replaced recipe");
        Ok(updated)
    }

    /// Removes a recipe and every ingredient it owns.
    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        let removed = run_in_transaction(self.store.as_ref(), |tx| tx.delete_recipe(id))?;
        if !removed {
            return Err(AppError::NotFound);
        }
        tracing::info!(recipe_id = id, "deleted recipe");
        Ok(())
    }

    fn ensure_exists(&self, id: i64) -> Result<(), AppError> {
        run_in_transaction(self.store.as_ref(), |tx| tx.find_recipe(id))?
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    fn write_recipe(
        &self,
        id: i64,
        changes: RecipeChanges<'_>,
        sync: IngredientSync<'_>,
    ) -> Result<RecipeResponse, AppError> {
        run_in_transaction(self.store.as_ref(), |tx| {
            // The recipe may have been deleted since `ensure_exists`.
            let Some(recipe) = tx.update_recipe(id, changes)? else {
                return Ok(None);
            };
            let ingredients = sync.apply(tx, recipe.id)?;
            Ok(Some(RecipeResponse::new(recipe, ingredients)))
        })?
        .ok_or(AppError::NotFound)
    }
}

fn with_ingredients(recipes: Vec<Recipe>, ingredients: Vec<Ingredient>) -> Vec<RecipeResponse> {
    let mut by_recipe: HashMap<i64, Vec<Ingredient>> = HashMap::new();
    for ingredient in ingredients {
        by_recipe
            .entry(ingredient.recipe_id)
            .or_default()
            .push(ingredient);
    }

    recipes
        .into_iter()
        .map(|recipe| {
            let owned = by_recipe.remove(&recipe.id).unwrap_or_default();
            RecipeResponse::new(recipe, owned)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecipeStore;
    use crate::types::{IngredientRequest, IngredientResponse};

    fn service() -> RecipeService {
        RecipeService::new(Arc::new(MemoryRecipeStore::new()))
    }

    fn request(name: &str, description: &str, ingredients: &[&str]) -> RecipeRequest {
        RecipeRequest {
            name: Some(Some(name.to_string())),
            description: Some(Some(description.to_string())),
            ingredients: Some(Some(
                ingredients
                    .iter()
                    .map(|n| IngredientRequest {
                        name: Some(Some(n.to_string())),
                    })
                    .collect(),
            )),
        }
    }

    fn ingredient_names(recipe: &RecipeResponse) -> Vec<&str> {
        recipe.ingredients.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_create_returns_full_record() {
        let service = service();
        let created = service
            .create(request(
                "Pizza",
                "Put it in the oven",
                &["dough", "cheese", "tomato"],
            ))
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.name, "Pizza");
        assert_eq!(ingredient_names(&created), vec!["dough", "cheese", "tomato"]);
    }

    #[test]
    fn test_invalid_create_stores_nothing() {
        let service = service();
        let err = service
            .create(request("", "Put it in the oven", &["dough"]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.has_field("name")));

        let err = service
            .create(RecipeRequest {
                ingredients: None,
                ..request("Pizza", "Put it in the oven", &[])
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.has_field("ingredients")));

        assert!(service.list(&RecipeQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn test_list_filters_and_orders_newest_first() {
        let service = service();
        let pizza = service.create(request("Pizza", "oven", &["dough"])).unwrap();
        let calzone = service.create(request("Calzone", "oven", &["dough"])).unwrap();
        let white = service
            .create(request("White Pizza", "oven", &["ricotta"]))
            .unwrap();

        let all = service.list(&RecipeQuery::default()).unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![white.id, calzone.id, pizza.id]);

        let filtered = service
            .list(&RecipeQuery::new(Some("Pizza".to_string())))
            .unwrap();
        let ids: Vec<i64> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![white.id, pizza.id]);
        assert_eq!(ingredient_names(&filtered[0]), vec!["ricotta"]);

        let lowercase = service
            .list(&RecipeQuery::new(Some("pizza".to_string())))
            .unwrap();
        assert!(lowercase.is_empty());
    }

    #[test]
    fn test_retrieve_matches_stored_state() {
        let service = service();
        let created = service
            .create(request("Pizza", "oven", &["dough", "cheese"]))
            .unwrap();

        let fetched = service.retrieve(created.id).unwrap();
        assert_eq!(
            fetched,
            RecipeResponse {
                id: created.id,
                name: "Pizza".to_string(),
                description: "oven".to_string(),
                ingredients: vec![
                    IngredientResponse {
                        name: "dough".to_string()
                    },
                    IngredientResponse {
                        name: "cheese".to_string()
                    },
                ],
            }
        );

        assert!(matches!(
            service.retrieve(created.id + 1),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn test_update_without_ingredients_keeps_them() {
        let service = service();
        let created = service
            .create(request("Pizza", "oven", &["dough", "cheese"]))
            .unwrap();

        let updated = service
            .update(
                created.id,
                RecipeRequest {
                    name: Some(Some("Pizza Margherita".to_string())),
                    ..RecipeRequest::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Pizza Margherita");
        assert_eq!(updated.description, "oven");
        assert_eq!(updated.ingredients, created.ingredients);
    }

    #[test]
    fn test_update_with_empty_ingredient_list_keeps_them() {
        let service = service();
        let created = service
            .create(request("Pizza", "oven", &["dough", "cheese"]))
            .unwrap();

        let updated = service
            .update(
                created.id,
                RecipeRequest {
                    ingredients: Some(Some(Vec::new())),
                    ..RecipeRequest::default()
                },
            )
            .unwrap();
        assert_eq!(updated.ingredients, created.ingredients);
        assert_eq!(service.retrieve(created.id).unwrap(), created);
    }

    #[test]
    fn test_update_with_ingredients_replaces_them() {
        let service = service();
        let created = service
            .create(request("Pizza", "oven", &["dough", "cheese", "tomato"]))
            .unwrap();

        let updated = service
            .update(
                created.id,
                RecipeRequest {
                    ingredients: request("", "", &["basil"]).ingredients,
                    ..RecipeRequest::default()
                },
            )
            .unwrap();
        assert_eq!(ingredient_names(&updated), vec!["basil"]);
        assert_eq!(updated.name, "Pizza");
    }

    #[test]
    fn test_update_rejects_blank_fields_without_writing() {
        let service = service();
        let created = service.create(request("Pizza", "oven", &["dough"])).unwrap();

        let err = service
            .update(
                created.id,
                RecipeRequest {
                    name: Some(Some("Calzone".to_string())),
                    ingredients: request("", "", &["flour", ""]).ingredients,
                    ..RecipeRequest::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.has_field("ingredients[1].name")));
        assert_eq!(service.retrieve(created.id).unwrap(), created);
    }

    #[test]
    fn test_update_missing_recipe_is_not_found_even_with_bad_payload() {
        let service = service();
        let err = service
            .update(
                12,
                RecipeRequest {
                    name: Some(Some(String::new())),
                    ..RecipeRequest::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_update_rejects_null_fields_without_writing() {
        let service = service();
        let created = service.create(request("Pizza", "oven", &["dough"])).unwrap();

        let err = service
            .update(
                created.id,
                RecipeRequest {
                    name: Some(None),
                    ingredients: Some(None),
                    ..RecipeRequest::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref e) if e.has_field("name") && e.has_field("ingredients")
        ));
        assert_eq!(service.retrieve(created.id).unwrap(), created);
    }

    #[test]
    fn test_replace_requires_all_fields() {
        let service = service();
        let created = service.create(request("Pizza", "oven", &["dough"])).unwrap();

        let err = service
            .replace(
                created.id,
                RecipeRequest {
                    name: Some(Some("Calzone".to_string())),
                    ..RecipeRequest::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.has_field("description")));

        let replaced = service
            .replace(created.id, request("Calzone", "folded", &["dough", "ham"]))
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.name, "Calzone");
        assert_eq!(ingredient_names(&replaced), vec!["dough", "ham"]);
    }

    #[test]
    fn test_delete_removes_only_that_recipe() {
        let service = service();
        let pizza = service
            .create(request("Pizza", "oven", &["dough", "cheese"]))
            .unwrap();
        let salad = service
            .create(request("Salad", "bowl", &["lettuce", "tomato", "oil"]))
            .unwrap();

        service.delete(pizza.id).unwrap();

        assert!(matches!(service.retrieve(pizza.id), Err(AppError::NotFound)));
        assert_eq!(service.retrieve(salad.id).unwrap().ingredients.len(), 3);
        assert!(matches!(service.delete(pizza.id), Err(AppError::NotFound)));
        assert_eq!(service.list(&RecipeQuery::default()).unwrap().len(), 1);
    }
}
