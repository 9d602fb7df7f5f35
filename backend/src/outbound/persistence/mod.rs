//! PostgreSQL persistence adapters built on Diesel with async connections.

mod diesel_allergy_repository;
mod diesel_recipe_repository;
mod diesel_shopping_list_repository;
mod diesel_social_repository;
mod diesel_support;
mod diesel_user_repository;
pub(crate) mod models;
pub mod pool;
pub mod schema;

pub use diesel_allergy_repository::DieselAllergyRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_shopping_list_repository::DieselShoppingListRepository;
pub use diesel_social_repository::DieselSocialRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
