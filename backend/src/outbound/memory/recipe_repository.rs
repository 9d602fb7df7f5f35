//! In-memory `RecipeRepository` adapter.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{RecipePersistenceError, RecipeRepository};
use crate::domain::recipe::{Recipe, RecipeId};
use crate::domain::user::UserId;

/// Vector-backed recipe store; insertion order doubles as creation order.
#[derive(Default)]
pub struct InMemoryRecipeRepository {
    recipes: Mutex<Vec<Recipe>>,
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        self.recipes
            .lock()
            .expect("recipe store lock")
            .push(recipe.clone());
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut recipes = self.recipes.lock().expect("recipe store lock");
        if let Some(slot) = recipes.iter_mut().find(|r| r.id() == recipe.id()) {
            *slot = recipe.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut recipes = self.recipes.lock().expect("recipe store lock");
        let before = recipes.len();
        recipes.retain(|r| r.id() != id);
        Ok(recipes.len() < before)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        Ok(self
            .recipes
            .lock()
            .expect("recipe store lock")
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn find_for_owner(
        &self,
        id: &RecipeId,
        owner: &UserId,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        Ok(self
            .recipes
            .lock()
            .expect("recipe store lock")
            .iter()
            .find(|r| r.id() == id && r.owner() == owner)
            .cloned())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Recipe>, RecipePersistenceError> {
        Ok(self
            .recipes
            .lock()
            .expect("recipe store lock")
            .iter()
            .filter(|r| r.owner() == owner)
            .cloned()
            .collect())
    }

    async fn list_public(&self) -> Result<Vec<Recipe>, RecipePersistenceError> {
        Ok(self
            .recipes
            .lock()
            .expect("recipe store lock")
            .iter()
            .filter(|r| r.is_public())
            .cloned()
            .collect())
    }

    async fn set_public(
        &self,
        id: &RecipeId,
        public: bool,
    ) -> Result<(), RecipePersistenceError> {
        let mut recipes = self.recipes.lock().expect("recipe store lock");
        if let Some(recipe) = recipes.iter_mut().find(|r| r.id() == id) {
            if public {
                recipe.publish();
            } else {
                let demoted = Recipe::new(
                    *recipe.id(),
                    *recipe.owner(),
                    recipe.title().clone(),
                    recipe.content().to_owned(),
                    false,
                    recipe.ingredients().to_vec(),
                );
                *recipe = demoted;
            }
        }
        Ok(())
    }
}
