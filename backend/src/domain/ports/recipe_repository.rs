//! Port abstraction for recipe persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::recipe::{Recipe, RecipeId};
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Row-level access to recipes and their ingredient rows.
///
/// A recipe and its ingredients form one aggregate: adapters load and store
/// them together, and deleting a recipe removes its ingredient rows in the
/// same unit of work.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its ingredient rows.
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError>;

    /// Replace a recipe's title, content, and ingredient rows.
    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError>;

    /// Delete a recipe and its ingredient rows. Returns whether a recipe
    /// existed.
    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipePersistenceError>;

    /// Fetch a recipe by identifier regardless of owner.
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Fetch a recipe only when owned by the given user.
    async fn find_for_owner(
        &self,
        id: &RecipeId,
        owner: &UserId,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// All recipes owned by the given user.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Recipe>, RecipePersistenceError>;

    /// All publicly visible recipes.
    async fn list_public(&self) -> Result<Vec<Recipe>, RecipePersistenceError>;

    /// Flip a recipe's public visibility.
    async fn set_public(&self, id: &RecipeId, public: bool) -> Result<(), RecipePersistenceError>;
}
