//! PostgreSQL-backed `AllergyRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AllergyPersistenceError, AllergyRepository};
use crate::domain::recipe::IngredientName;
use crate::domain::user::UserId;

use super::diesel_support::{map_diesel_error, map_pool_error};
use super::models::{AllergyRow, NewAllergyRow};
use super::pool::{DbPool, PoolError};
use super::schema::allergies;

/// Diesel-backed implementation of the `AllergyRepository` port.
#[derive(Clone)]
pub struct DieselAllergyRepository {
    pool: DbPool,
}

impl DieselAllergyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AllergyPersistenceError {
    map_pool_error(error, AllergyPersistenceError::connection)
}

fn map_diesel(error: DieselError) -> AllergyPersistenceError {
    map_diesel_error(
        error,
        AllergyPersistenceError::query,
        AllergyPersistenceError::connection,
    )
}

#[async_trait]
impl AllergyRepository for DieselAllergyRepository {
    async fn list_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<IngredientName>, AllergyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<AllergyRow> = allergies::table
            .filter(allergies::user_id.eq(user.as_uuid()))
            .select(AllergyRow::as_select())
            .order_by(allergies::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter()
            .map(|row| {
                IngredientName::new(row.name)
                    .map_err(|_| AllergyPersistenceError::query("stored allergy failed validation"))
            })
            .collect()
    }

    async fn add(
        &self,
        user: &UserId,
        name: &IngredientName,
    ) -> Result<(), AllergyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewAllergyRow {
            id: Uuid::new_v4(),
            user_id: *user.as_uuid(),
            name: name.as_ref(),
        };

        // Unique (user_id, name): re-adding the same allergy is a no-op.
        diesel::insert_into(allergies::table)
            .values(&new_row)
            .on_conflict((allergies::user_id, allergies::name))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn remove(
        &self,
        user: &UserId,
        name: &IngredientName,
    ) -> Result<bool, AllergyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(
            allergies::table
                .filter(allergies::user_id.eq(user.as_uuid()))
                .filter(allergies::name.eq(name.as_ref())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, AllergyPersistenceError::Connection { .. }));
    }

    #[test]
    fn diesel_errors_map_to_query_errors() {
        let err = map_diesel(DieselError::NotFound);
        assert!(matches!(err, AllergyPersistenceError::Query { .. }));
    }
}
