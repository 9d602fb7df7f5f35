//! Shopping-list use-cases: merge from a recipe, manual replace, export.
//!
//! The two write paths deliberately disagree about duplicates. Merging a
//! recipe's ingredients is an idempotent set-union keyed on the exact name;
//! replacing the list stores the caller's items verbatim, duplicates and
//! all. Do not unify them: one models "add what I'm missing", the other
//! "this is my list now".

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::{RecipeRepository, ShoppingListRepository};
use crate::domain::recipe::{IngredientName, RecipeId};
use crate::domain::repo_errors::{map_recipe_persistence_error, map_shopping_list_persistence_error};
use crate::domain::user::UserId;

/// Shopping-list service over the recipe and list repositories.
pub struct ShoppingListService {
    recipes: Arc<dyn RecipeRepository>,
    items: Arc<dyn ShoppingListRepository>,
}

impl ShoppingListService {
    /// Build the service from its collaborators.
    pub fn new(recipes: Arc<dyn RecipeRepository>, items: Arc<dyn ShoppingListRepository>) -> Self {
        Self { recipes, items }
    }

    /// The user's current list, in order.
    pub async fn list(&self, user: &UserId) -> Result<Vec<IngredientName>, Error> {
        self.items.items_for(user).await.map_err(map_shopping_list_persistence_error)
    }

    /// Merge a recipe's ingredients into the user's list.
    ///
    /// Only names not already present (case-sensitive, exact match) are
    /// appended, so running this twice with the same recipe changes nothing
    /// the second time. Returns the resulting list.
    pub async fn add_recipe_ingredients(
        &self,
        user: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<Vec<IngredientName>, Error> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await
            .map_err(map_recipe_persistence_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))?;

        let current = self.items.items_for(user).await.map_err(map_shopping_list_persistence_error)?;
        let present: HashSet<&IngredientName> = current.iter().collect();

        let missing: Vec<IngredientName> = recipe
            .ingredients()
            .iter()
            .filter(|name| !present.contains(*name))
            .cloned()
            .collect();

        if !missing.is_empty() {
            self.items
                .append(user, &missing)
                .await
                .map_err(map_shopping_list_persistence_error)?;
        }

        self.items.items_for(user).await.map_err(map_shopping_list_persistence_error)
    }

    /// Overwrite the user's list with the given lines, verbatim.
    ///
    /// Lines are trimmed and blank lines dropped; duplicates and order are
    /// preserved. Returns the stored list.
    pub async fn replace(
        &self,
        user: &UserId,
        lines: &[String],
    ) -> Result<Vec<IngredientName>, Error> {
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let name = IngredientName::new(trimmed)
                .map_err(|error| Error::invalid_request(error.to_string()))?;
            items.push(name);
        }

        self.items
            .replace(user, &items)
            .await
            .map_err(map_shopping_list_persistence_error)?;
        Ok(items)
    }

    /// Render the list as a newline-joined plain-text document.
    ///
    /// An empty list is a client error: there is nothing to download.
    pub async fn export(&self, user: &UserId) -> Result<String, Error> {
        let items = self.items.items_for(user).await.map_err(map_shopping_list_persistence_error)?;
        if items.is_empty() {
            return Err(Error::invalid_request("shopping list is empty"));
        }
        let lines: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        Ok(lines.join("\n"))
    }
}
