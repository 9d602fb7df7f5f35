//! PostgreSQL-backed `ShoppingListRepository` implementation using Diesel.
//!
//! Items carry an explicit position column so the stored list keeps the
//! order (and duplicates) the caller provided.

use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ShoppingListPersistenceError, ShoppingListRepository};
use crate::domain::recipe::IngredientName;
use crate::domain::user::UserId;

use super::diesel_support::{map_diesel_error, map_pool_error};
use super::models::{NewShoppingListItemRow, ShoppingListItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::shopping_list_items;

/// Diesel-backed implementation of the `ShoppingListRepository` port.
#[derive(Clone)]
pub struct DieselShoppingListRepository {
    pool: DbPool,
}

impl DieselShoppingListRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ShoppingListPersistenceError {
    map_pool_error(error, ShoppingListPersistenceError::connection)
}

fn map_diesel(error: DieselError) -> ShoppingListPersistenceError {
    map_diesel_error(
        error,
        ShoppingListPersistenceError::query,
        ShoppingListPersistenceError::connection,
    )
}

fn rows_to_names(
    rows: Vec<ShoppingListItemRow>,
) -> Result<Vec<IngredientName>, ShoppingListPersistenceError> {
    rows.into_iter()
        .map(|row| {
            IngredientName::new(row.name).map_err(|_| {
                ShoppingListPersistenceError::query("stored item failed validation")
            })
        })
        .collect()
}

fn item_rows<'a>(
    user_id: Uuid,
    items: &'a [IngredientName],
    first_position: i32,
) -> Vec<NewShoppingListItemRow<'a>> {
    items
        .iter()
        .enumerate()
        .map(|(offset, name)| NewShoppingListItemRow {
            id: Uuid::new_v4(),
            user_id,
            name: name.as_ref(),
            position: first_position.saturating_add_unsigned(offset as u32),
        })
        .collect()
}

#[async_trait]
impl ShoppingListRepository for DieselShoppingListRepository {
    async fn items_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<IngredientName>, ShoppingListPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<ShoppingListItemRow> = shopping_list_items::table
            .filter(shopping_list_items::user_id.eq(user.as_uuid()))
            .select(ShoppingListItemRow::as_select())
            .order_by(shopping_list_items::position)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_names(rows)
    }

    async fn append(
        &self,
        user: &UserId,
        items: &[IngredientName],
    ) -> Result<(), ShoppingListPersistenceError> {
        if items.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let user_id = *user.as_uuid();
        let items = items.to_vec();

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let last: Option<i32> = shopping_list_items::table
                    .filter(shopping_list_items::user_id.eq(user_id))
                    .select(max(shopping_list_items::position))
                    .first(conn)
                    .await?;
                let first_position = last.map_or(0, |p| p.saturating_add(1));

                let rows = item_rows(user_id, &items, first_position);
                diesel::insert_into(shopping_list_items::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn replace(
        &self,
        user: &UserId,
        items: &[IngredientName],
    ) -> Result<(), ShoppingListPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let user_id = *user.as_uuid();
        let items = items.to_vec();

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::delete(
                    shopping_list_items::table
                        .filter(shopping_list_items::user_id.eq(user_id)),
                )
                .execute(conn)
                .await?;

                if !items.is_empty() {
                    let rows = item_rows(user_id, &items, 0);
                    diesel::insert_into(shopping_list_items::table)
                        .values(&rows)
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

    #[test]
    fn item_rows_number_positions_from_the_start_offset() {
        let user_id = Uuid::new_v4();
        let names = names(&["Milk", "Milk", "Eggs"]);
        let rows = item_rows(user_id, &names, 5);
        let positions: Vec<i32> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![5, 6, 7]);
        assert!(rows.iter().all(|r| r.user_id == user_id));
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(
            err,
            ShoppingListPersistenceError::Connection { .. }
        ));
    }
}
