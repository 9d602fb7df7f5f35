//! In-memory `ShoppingListRepository` adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ShoppingListPersistenceError, ShoppingListRepository};
use crate::domain::recipe::IngredientName;
use crate::domain::user::UserId;

/// Per-user ordered item lists; duplicates are stored as-is.
#[derive(Default)]
pub struct InMemoryShoppingListRepository {
    lists: Mutex<HashMap<UserId, Vec<IngredientName>>>,
}

#[async_trait]
impl ShoppingListRepository for InMemoryShoppingListRepository {
    async fn items_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<IngredientName>, ShoppingListPersistenceError> {
        Ok(self
            .lists
            .lock()
            .expect("list store lock")
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(
        &self,
        user: &UserId,
        items: &[IngredientName],
    ) -> Result<(), ShoppingListPersistenceError> {
        self.lists
            .lock()
            .expect("list store lock")
            .entry(*user)
            .or_default()
            .extend(items.iter().cloned());
        Ok(())
    }

    async fn replace(
        &self,
        user: &UserId,
        items: &[IngredientName],
    ) -> Result<(), ShoppingListPersistenceError> {
        self.lists
            .lock()
            .expect("list store lock")
            .insert(*user, items.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn names(raw: &[&str]) -> Vec<IngredientName> {
        raw.iter()
            .map(|s| IngredientName::new(*s).expect("name"))
            .collect()
    }

    #[tokio::test]
    async fn append_preserves_order_and_duplicates() {
        let repo = InMemoryShoppingListRepository::default();
        let user = UserId::random();

        repo.append(&user, &names(&["Milk"])).await.expect("append");
        repo.append(&user, &names(&["Eggs", "Milk"]))
            .await
            .expect("append");

        let items = repo.items_for(&user).await.expect("query");
        let labels: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        assert_eq!(labels, vec!["Milk", "Eggs", "Milk"]);
    }

    #[tokio::test]
    async fn replace_discards_the_previous_list() {
        let repo = InMemoryShoppingListRepository::default();
        let user = UserId::random();

        repo.append(&user, &names(&["Milk"])).await.expect("append");
        repo.replace(&user, &names(&["Eggs"])).await.expect("replace");

        let items = repo.items_for(&user).await.expect("query");
        assert_eq!(items, names(&["Eggs"]));
    }

    #[tokio::test]
    async fn lists_are_scoped_per_user() {
        let repo = InMemoryShoppingListRepository::default();
        let first = UserId::random();
        let second = UserId::random();

        repo.append(&first, &names(&["Milk"])).await.expect("append");

        assert!(repo.items_for(&second).await.expect("query").is_empty());
    }
}
