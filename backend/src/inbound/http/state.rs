//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and ports, keeping them testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AllergyRepository, RecipeRepository, SocialRepository, UserRepository,
};
use crate::domain::{
    AccountService, AuthGate, AuthMode, RecipeGenerationService, ShoppingListService,
};

/// Parameter object bundling the dependencies HTTP handlers need.
pub struct HttpStatePorts {
    /// Signup/login use-cases.
    pub accounts: Arc<AccountService>,
    /// Credential resolution for protected handlers.
    pub gate: Arc<AuthGate>,
    /// Shopping-list use-cases.
    pub shopping_list: Arc<ShoppingListService>,
    /// LLM-assisted recipe generation.
    pub generator: Arc<RecipeGenerationService>,
    /// Recipe persistence.
    pub recipes: Arc<dyn RecipeRepository>,
    /// Posts, likes, bookmarks, comments.
    pub social: Arc<dyn SocialRepository>,
    /// Stored allergies.
    pub allergies: Arc<dyn AllergyRepository>,
    /// User lookups (comment author names).
    pub users: Arc<dyn UserRepository>,
    /// Which credential mechanism signup/login hand out.
    pub auth_mode: AuthMode,
}

/// Dependency bundle for HTTP handlers.
pub struct HttpState {
    pub(crate) accounts: Arc<AccountService>,
    pub(crate) gate: Arc<AuthGate>,
    pub(crate) shopping_list: Arc<ShoppingListService>,
    pub(crate) generator: Arc<RecipeGenerationService>,
    pub(crate) recipes: Arc<dyn RecipeRepository>,
    pub(crate) social: Arc<dyn SocialRepository>,
    pub(crate) allergies: Arc<dyn AllergyRepository>,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) auth_mode: AuthMode,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            gate,
            shopping_list,
            generator,
            recipes,
            social,
            allergies,
            users,
            auth_mode,
        } = ports;
        Self {
            accounts,
            gate,
            shopping_list,
            generator,
            recipes,
            social,
            allergies,
            users,
            auth_mode,
        }
    }

    /// Which credential mechanism signup/login hand out.
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }
}
