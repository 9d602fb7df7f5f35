//! Port abstraction for stored user allergies.
use async_trait::async_trait;

use crate::domain::recipe::IngredientName;
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by allergy repository adapters.
    pub enum AllergyPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "allergy repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "allergy repository query failed: {message}",
    }
}

/// Set of ingredient names a user must avoid.
///
/// The set feeds the recipe generator as implicit dietary restrictions.
#[async_trait]
pub trait AllergyRepository: Send + Sync {
    /// The user's allergies, in insertion order.
    async fn list_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<IngredientName>, AllergyPersistenceError>;

    /// Record an allergy; adding an already-present name is a no-op.
    async fn add(
        &self,
        user: &UserId,
        name: &IngredientName,
    ) -> Result<(), AllergyPersistenceError>;

    /// Remove an allergy. Returns whether it was present.
    async fn remove(
        &self,
        user: &UserId,
        name: &IngredientName,
    ) -> Result<bool, AllergyPersistenceError>;
}
