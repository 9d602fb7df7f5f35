//! PostgreSQL-backed `RecipeRepository` implementation using Diesel.
//!
//! A recipe and its ingredient rows are one aggregate: every multi-statement
//! mutation runs in a transaction so a failure can never leave a recipe with
//! half its ingredients.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RecipePersistenceError, RecipeRepository};
use crate::domain::recipe::{IngredientName, Recipe, RecipeId, RecipeTitle};
use crate::domain::user::UserId;

use super::diesel_support::{map_diesel_error, map_pool_error};
use super::models::{IngredientRow, NewIngredientRow, NewRecipeRow, RecipeRow, RecipeUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipes};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> RecipePersistenceError {
    map_pool_error(error, RecipePersistenceError::connection)
}

fn map_diesel(error: DieselError) -> RecipePersistenceError {
    map_diesel_error(
        error,
        RecipePersistenceError::query,
        RecipePersistenceError::connection,
    )
}

/// Convert a recipe row plus its ingredient names to a domain recipe.
fn row_to_recipe(
    row: RecipeRow,
    ingredient_names: Vec<String>,
) -> Result<Recipe, RecipePersistenceError> {
    let title = RecipeTitle::new(&row.title)
        .map_err(|_| RecipePersistenceError::query("stored title failed validation"))?;
    let ingredient_names = ingredient_names
        .into_iter()
        .map(IngredientName::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| RecipePersistenceError::query("stored ingredient failed validation"))?;
    Ok(Recipe::new(
        RecipeId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        title,
        row.content,
        row.is_public,
        ingredient_names,
    ))
}

fn ingredient_rows<'a>(recipe_id: Uuid, names: &'a [IngredientName]) -> Vec<NewIngredientRow<'a>> {
    names
        .iter()
        .map(|name| NewIngredientRow {
            id: Uuid::new_v4(),
            recipe_id,
            name: name.as_ref(),
        })
        .collect()
}

/// Load ingredient names for a set of recipes, keyed by recipe id.
async fn load_ingredients(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, DieselError> {
    let rows: Vec<IngredientRow> = ingredients::table
        .filter(ingredients::recipe_id.eq_any(recipe_ids))
        .select(IngredientRow::as_select())
        .order_by(ingredients::name)
        .load(conn)
        .await?;

    let mut by_recipe: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        by_recipe.entry(row.recipe_id).or_default().push(row.name);
    }
    Ok(by_recipe)
}

async fn rows_to_recipes(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipePersistenceError> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut ingredients_by_recipe = load_ingredients(conn, &ids).await.map_err(map_diesel)?;

    rows.into_iter()
        .map(|row| {
            let names = ingredients_by_recipe.remove(&row.id).unwrap_or_default();
            row_to_recipe(row, names)
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let recipe_id = *recipe.id().as_uuid();
        let new_row = NewRecipeRow {
            id: recipe_id,
            owner_id: *recipe.owner().as_uuid(),
            title: recipe.title().as_ref(),
            content: recipe.content(),
            is_public: recipe.is_public(),
        };
        let new_ingredients = ingredient_rows(recipe_id, recipe.ingredients());

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(recipes::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;
                if !new_ingredients.is_empty() {
                    diesel::insert_into(ingredients::table)
                        .values(&new_ingredients)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let recipe_id = *recipe.id().as_uuid();
        let update = RecipeUpdate {
            title: recipe.title().as_ref(),
            content: recipe.content(),
        };
        let new_ingredients = ingredient_rows(recipe_id, recipe.ingredients());

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::update(recipes::table.filter(recipes::id.eq(recipe_id)))
                    .set(&update)
                    .execute(conn)
                    .await?;
                diesel::delete(ingredients::table.filter(ingredients::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                if !new_ingredients.is_empty() {
                    diesel::insert_into(ingredients::table)
                        .values(&new_ingredients)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let recipe_id = *id.as_uuid();

        let deleted: usize = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    diesel::delete(
                        ingredients::table.filter(ingredients::recipe_id.eq(recipe_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(recipes::table.filter(recipes::id.eq(recipe_id)))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id.as_uuid()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        match row {
            Some(row) => Ok(rows_to_recipes(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_for_owner(
        &self,
        id: &RecipeId,
        owner: &UserId,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id.as_uuid()))
            .filter(recipes::owner_id.eq(owner.as_uuid()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        match row {
            Some(row) => Ok(rows_to_recipes(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::owner_id.eq(owner.as_uuid()))
            .select(RecipeRow::as_select())
            .order_by(recipes::created_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_recipes(&mut conn, rows).await
    }

    async fn list_public(&self) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::is_public.eq(true))
            .select(RecipeRow::as_select())
            .order_by(recipes::created_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_recipes(&mut conn, rows).await
    }

    async fn set_public(&self, id: &RecipeId, public: bool) -> Result<(), RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::update(recipes::table.filter(recipes::id.eq(id.as_uuid())))
            .set(recipes::is_public.eq(public))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;

    use super::*;

    #[test]
    fn rows_convert_with_their_ingredients() {
        let row = RecipeRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Pancakes".to_owned(),
            content: "Mix and fry.".to_owned(),
            is_public: true,
            created_at: Utc::now(),
        };
        let recipe =
            row_to_recipe(row, vec!["Flour".to_owned(), "Milk".to_owned()]).expect("converts");
        assert!(recipe.is_public());
        assert_eq!(recipe.ingredients().len(), 2);
    }

    #[test]
    fn blank_stored_title_is_a_query_error() {
        let row = RecipeRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "  ".to_owned(),
            content: String::new(),
            is_public: false,
            created_at: Utc::now(),
        };
        let err = row_to_recipe(row, vec![]).expect_err("must fail");
        assert!(matches!(err, RecipePersistenceError::Query { .. }));
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, RecipePersistenceError::Connection { .. }));
    }
}
