use super::{RecipeStore, StoreError, StoreTransaction};
use crate::db::DbPool;
use crate::models::{Ingredient, NewIngredient, NewRecipe, Recipe, RecipeChanges};
use crate::recipes::query::RecipeQuery;
use crate::schema::{ingredients, recipes};
use diesel::prelude::*;

/// PostgreSQL-backed store. Each transaction checks out one pooled connection.
#[derive(Debug, Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RecipeStore for PgRecipeStore {
    fn transaction(
        &self,
        work: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        conn.transaction::<_, StoreError, _>(|conn| work(&mut PgTransaction { conn }))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

struct PgTransaction<'c> {
    conn: &'c mut PgConnection,
}

impl StoreTransaction for PgTransaction<'_> {
    fn list_recipes(&mut self, query: &RecipeQuery) -> Result<Vec<Recipe>, StoreError> {
        let mut statement = recipes::table.select(Recipe::as_select()).into_boxed();

        // LIKE is case-sensitive in PostgreSQL, matching the substring filter semantics.
        if let Some(pattern) = query.like_pattern() {
            statement = statement.filter(recipes::name.like(pattern));
        }

        Ok(statement.order(recipes::id.desc()).load(self.conn)?)
    }

    fn find_recipe(&mut self, id: i64) -> Result<Option<Recipe>, StoreError> {
        Ok(recipes::table
            .find(id)
            .select(Recipe::as_select())
            .first(self.conn)
            .optional()?)
    }

    fn insert_recipe(&mut self, name: &str, description: &str) -> Result<Recipe, StoreError> {
        Ok(diesel::insert_into(recipes::table)
            .values(NewRecipe { name, description })
            .returning(Recipe::as_returning())
            .get_result(self.conn)?)
    }

    fn update_recipe(
        &mut self,
        id: i64,
        changes: RecipeChanges<'_>,
    ) -> Result<Option<Recipe>, StoreError> {
        // Diesel rejects an UPDATE with an empty SET clause.
        if changes.is_empty() {
            return self.find_recipe(id);
        }

        Ok(diesel::update(recipes::table.find(id))
            .set(changes)
            .returning(Recipe::as_returning())
            .get_result(self.conn)
            .optional()?)
    }

    fn list_ingredients(&mut self, recipe_ids: &[i64]) -> Result<Vec<Ingredient>, StoreError> {
        Ok(ingredients::table
            .filter(ingredients::recipe_id.eq_any(recipe_ids))
            .select(Ingredient::as_select())
            .order(ingredients::id.asc())
            .load(self.conn)?)
    }

    fn insert_ingredients(
        &mut self,
        recipe_id: i64,
        names: &[String],
    ) -> Result<Vec<Ingredient>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<NewIngredient> = names
            .iter()
            .map(|name| NewIngredient { recipe_id, name })
            .collect();

        diesel::insert_into(ingredients::table)
            .values(&rows)
            .returning(Ingredient::as_returning())
            .get_results(self.conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => StoreError::MissingRecipe(recipe_id),
                other => StoreError::Database(other),
            })
    }

    fn delete_ingredients(&mut self, recipe_id: i64) -> Result<usize, StoreError> {
        Ok(
            diesel::delete(ingredients::table.filter(ingredients::recipe_id.eq(recipe_id)))
                .execute(self.conn)?,
        )
    }

    fn delete_recipe(&mut self, id: i64) -> Result<bool, StoreError> {
        self.delete_ingredients(id)?;
        let deleted = diesel::delete(recipes::table.find(id)).execute(self.conn)?;
        Ok(deleted > 0)
    }
}
