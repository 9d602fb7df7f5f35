//! In-memory repository adapters.
//!
//! Used when the server runs without a configured database (development,
//! handler tests, the integration suite). State lives behind plain mutexes;
//! each method takes the lock once and never holds it across an await.

mod allergy_repository;
mod recipe_repository;
mod shopping_list_repository;
mod social_repository;
mod user_repository;

pub use allergy_repository::InMemoryAllergyRepository;
pub use recipe_repository::InMemoryRecipeRepository;
pub use shopping_list_repository::InMemoryShoppingListRepository;
pub use social_repository::InMemorySocialRepository;
pub use user_repository::InMemoryUserRepository;
