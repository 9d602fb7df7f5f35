//! Port abstraction for shopping-list persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::recipe::IngredientName;
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by shopping-list repository adapters.
    pub enum ShoppingListPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "shopping list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "shopping list repository query failed: {message}",
    }
}

/// Ordered multiset of ingredient names per user.
///
/// The repository stores items verbatim in insertion order; whether
/// duplicates are permitted is the calling service's decision, not the
/// adapter's.
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// The user's current items, in list order.
    async fn items_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<IngredientName>, ShoppingListPersistenceError>;

    /// Append items to the end of the user's list, preserving their order.
    async fn append(
        &self,
        user: &UserId,
        items: &[IngredientName],
    ) -> Result<(), ShoppingListPersistenceError>;

    /// Atomically delete the user's list and insert the given items
    /// verbatim, duplicates included.
    async fn replace(
        &self,
        user: &UserId,
        items: &[IngredientName],
    ) -> Result<(), ShoppingListPersistenceError>;
}
