//! In-memory `AllergyRepository` adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{AllergyPersistenceError, AllergyRepository};
use crate::domain::recipe::IngredientName;
use crate::domain::user::UserId;

/// Per-user allergy sets kept in insertion order.
#[derive(Default)]
pub struct InMemoryAllergyRepository {
    allergies: Mutex<HashMap<UserId, Vec<IngredientName>>>,
}

#[async_trait]
impl AllergyRepository for InMemoryAllergyRepository {
    async fn list_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<IngredientName>, AllergyPersistenceError> {
        Ok(self
            .allergies
            .lock()
            .expect("allergy store lock")
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(
        &self,
        user: &UserId,
        name: &IngredientName,
    ) -> Result<(), AllergyPersistenceError> {
        let mut allergies = self.allergies.lock().expect("allergy store lock");
        let set = allergies.entry(*user).or_default();
        if !set.contains(name) {
            set.push(name.clone());
        }
        Ok(())
    }

    async fn remove(
        &self,
        user: &UserId,
        name: &IngredientName,
    ) -> Result<bool, AllergyPersistenceError> {
        let mut allergies = self.allergies.lock().expect("allergy store lock");
        let Some(set) = allergies.get_mut(user) else {
            return Ok(false);
        };
        let before = set.len();
        set.retain(|existing| existing != name);
        Ok(set.len() < before)
    }
}
