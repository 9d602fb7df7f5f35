//! Domain entities, services, and ports.
//!
//! Everything under this module is transport agnostic: no actix, Diesel, or
//! reqwest types appear in signatures. Inbound adapters translate HTTP
//! payloads into these types and map [`Error`] back to responses.

pub mod account_service;
pub mod auth;
pub mod auth_gate;
pub mod error;
pub mod generation;
pub mod password;
pub mod ports;
pub mod recipe;
pub(crate) mod repo_errors;
pub mod shopping_list;
pub mod social;
pub mod token;
pub mod user;

pub use self::account_service::{AccountService, IssuedCredentials};
pub use self::auth::{AuthValidationError, Credentials, SignupDetails};
pub use self::auth_gate::{AuthGate, AuthMode, RequestCredentials};
pub use self::error::{Error, ErrorCode};
pub use self::generation::{GenerationRequest, RecipeGenerationService};
pub use self::password::PasswordHasher;
pub use self::recipe::{
    IngredientName, Recipe, RecipeDraft, RecipeId, RecipeTitle, RecipeValidationError,
};
pub use self::shopping_list::ShoppingListService;
pub use self::social::{Bookmark, Comment, Post, PostId};
pub use self::token::{AccessTokens, TokenError, default_token_ttl};
pub use self::user::{
    DisplayName, EmailAddress, PasswordHash, Role, User, UserId, UserValidationError,
};
