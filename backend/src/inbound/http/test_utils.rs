//! Shared fixtures for handler tests.
//!
//! Builds a fully wired [`HttpState`] over the in-memory adapters so handler
//! tests exercise the real routing, extraction, and error mapping without
//! any I/O.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, test, web};
use chrono::Duration;
use serde_json::Value;

use crate::domain::ports::{FixtureRecipeCompletion, RecipeCompletion};
use crate::domain::{
    AccessTokens, AccountService, AuthGate, AuthMode, PasswordHasher, RecipeGenerationService,
    ShoppingListService,
};
use crate::outbound::memory::{
    InMemoryAllergyRepository, InMemoryRecipeRepository, InMemoryShoppingListRepository,
    InMemorySocialRepository, InMemoryUserRepository,
};

use super::state::{HttpState, HttpStatePorts};

/// Cookie-session middleware with an ephemeral key, suitable for tests.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Handles on the in-memory adapters behind a test [`HttpState`].
pub(crate) struct TestHarness {
    pub users: Arc<InMemoryUserRepository>,
    pub recipes: Arc<InMemoryRecipeRepository>,
    pub shopping: Arc<InMemoryShoppingListRepository>,
    pub social: Arc<InMemorySocialRepository>,
    pub allergies: Arc<InMemoryAllergyRepository>,
    pub tokens: Arc<AccessTokens>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            recipes: Arc::new(InMemoryRecipeRepository::default()),
            shopping: Arc::new(InMemoryShoppingListRepository::default()),
            social: Arc::new(InMemorySocialRepository::default()),
            allergies: Arc::new(InMemoryAllergyRepository::default()),
            tokens: Arc::new(AccessTokens::new(b"test-secret", Duration::minutes(30))),
        }
    }

    /// Bearer-mode state over the harness adapters.
    pub fn state(&self) -> HttpState {
        self.build(AuthMode::Bearer, Arc::new(FixtureRecipeCompletion))
    }

    /// Cookie-mode state over the harness adapters.
    pub fn cookie_state(&self) -> HttpState {
        self.build(AuthMode::CookieSession, Arc::new(FixtureRecipeCompletion))
    }

    /// Bearer-mode state with a custom completion provider.
    pub fn state_with_completion(&self, completion: Arc<dyn RecipeCompletion>) -> HttpState {
        self.build(AuthMode::Bearer, completion)
    }

    fn build(&self, mode: AuthMode, completion: Arc<dyn RecipeCompletion>) -> HttpState {
        let accounts = Arc::new(AccountService::new(
            self.users.clone(),
            PasswordHasher::fast_for_tests(),
            self.tokens.clone(),
        ));
        let gate = Arc::new(AuthGate::new(self.tokens.clone(), self.users.clone()));
        let shopping_list = Arc::new(ShoppingListService::new(
            self.recipes.clone(),
            self.shopping.clone(),
        ));
        let generator = Arc::new(RecipeGenerationService::new(
            completion,
            self.recipes.clone(),
            self.allergies.clone(),
        ));
        HttpState::new(HttpStatePorts {
            accounts,
            gate,
            shopping_list,
            generator,
            recipes: self.recipes.clone(),
            social: self.social.clone(),
            allergies: self.allergies.clone(),
            users: self.users.clone(),
            auth_mode: mode,
        })
    }
}

/// Bearer-mode state over fresh in-memory adapters.
pub(crate) fn test_state() -> HttpState {
    TestHarness::new().state()
}

/// Full application for handler tests: session middleware plus every route
/// under `/api/v1`, mirroring the server wiring.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(crate::server::api_scope(test_session_middleware()))
}

/// Sign up a fresh account and return its bearer token.
pub(crate) async fn signup<S>(app: &S, email: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(serde_json::json!({ "email": email, "password": "pw123", "name": "U" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("token present")
        .to_owned()
}
