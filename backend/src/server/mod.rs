//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::{SessionMiddleware, config::CookieContentSecurity};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, Scope, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::{
    AllergyRepository, FixtureRecipeCompletion, RecipeCompletion, RecipeRepository,
    ShoppingListRepository, SocialRepository, UserRepository,
};
use crate::domain::{
    AccessTokens, AccountService, AuthGate, PasswordHasher, RecipeGenerationService,
    ShoppingListService,
};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::{HttpState, HttpStatePorts, accounts, allergies, generate, recipes,
    shopping_list, social};
use crate::middleware::Trace;
use crate::outbound::llm::HttpCompletionClient;
use crate::outbound::memory::{
    InMemoryAllergyRepository, InMemoryRecipeRepository, InMemoryShoppingListRepository,
    InMemorySocialRepository, InMemoryUserRepository,
};
use crate::outbound::persistence::{
    DieselAllergyRepository, DieselRecipeRepository, DieselShoppingListRepository,
    DieselSocialRepository, DieselUserRepository,
};

/// Session middleware over a private cookie store.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .build()
}

/// The `/api/v1` scope with every handler registered behind the session
/// middleware. Shared by the server and the handler tests so routing cannot
/// drift between the two.
pub fn api_scope(
    session: SessionMiddleware<CookieSessionStore>,
) -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/api/v1")
        .wrap(session)
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::logout)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(shopping_list::get_shopping_list)
        .service(shopping_list::replace_shopping_list)
        .service(shopping_list::export_shopping_list)
        .service(shopping_list::add_recipe_to_shopping_list)
        .service(social::publish_recipe)
        .service(social::list_posts)
        .service(social::like_post)
        .service(social::unlike_post)
        .service(social::add_bookmark)
        .service(social::list_bookmarks)
        .service(social::add_comment)
        .service(social::list_comments)
        .service(allergies::list_allergies)
        .service(allergies::add_allergy)
        .service(allergies::remove_allergy)
        .service(generate::generate_recipe)
}

/// Repository bundle resolved from the configuration.
struct Repositories {
    users: Arc<dyn UserRepository>,
    recipes: Arc<dyn RecipeRepository>,
    shopping: Arc<dyn ShoppingListRepository>,
    social: Arc<dyn SocialRepository>,
    allergies: Arc<dyn AllergyRepository>,
}

/// Pick Diesel adapters when a pool is configured, in-memory otherwise.
fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            shopping: Arc::new(DieselShoppingListRepository::new(pool.clone())),
            social: Arc::new(DieselSocialRepository::new(pool.clone())),
            allergies: Arc::new(DieselAllergyRepository::new(pool.clone())),
        },
        None => {
            tracing::warn!("no database configured; using in-memory repositories");
            Repositories {
                users: Arc::new(InMemoryUserRepository::default()),
                recipes: Arc::new(InMemoryRecipeRepository::default()),
                shopping: Arc::new(InMemoryShoppingListRepository::default()),
                social: Arc::new(InMemorySocialRepository::default()),
                allergies: Arc::new(InMemoryAllergyRepository::default()),
            }
        }
    }
}

/// Pick the HTTP completion client when configured, the fixture otherwise.
fn build_completion(config: &ServerConfig) -> std::io::Result<Arc<dyn RecipeCompletion>> {
    match &config.completion {
        Some(completion) => {
            let client = HttpCompletionClient::new(completion.clone())
                .map_err(|e| std::io::Error::other(format!("completion client failed: {e}")))?;
            Ok(Arc::new(client))
        }
        None => {
            tracing::warn!("no completion provider configured; using fixture replies");
            Ok(Arc::new(FixtureRecipeCompletion))
        }
    }
}

/// Assemble the HTTP state from the configuration.
fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let repositories = build_repositories(config);
    let completion = build_completion(config)?;
    let tokens = Arc::new(AccessTokens::new(&config.token_secret, config.token_ttl));

    let accounts = Arc::new(AccountService::new(
        repositories.users.clone(),
        PasswordHasher::default(),
        tokens.clone(),
    ));
    let gate = Arc::new(AuthGate::new(tokens, repositories.users.clone()));
    let shopping_list = Arc::new(ShoppingListService::new(
        repositories.recipes.clone(),
        repositories.shopping.clone(),
    ));
    let generator = Arc::new(RecipeGenerationService::new(
        completion,
        repositories.recipes.clone(),
        repositories.allergies.clone(),
    ));

    Ok(HttpState::new(HttpStatePorts {
        accounts,
        gate,
        shopping_list,
        generator,
        recipes: repositories.recipes,
        social: repositories.social,
        allergies: repositories.allergies,
        users: repositories.users,
        auth_mode: config.auth_mode,
    }))
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        health_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = session_middleware(key, cookie_secure, same_site);

    #[allow(unused_mut, reason = "reassigned when Swagger UI is compiled in")]
    let mut app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(Trace)
        .service(api_scope(session))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    actix_web_prom::PrometheusMetricsBuilder::new("ladle")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}

/// Build the HTTP server from the configuration.
///
/// Returns the running-ready server and the shared health state; callers
/// mark the state ready once startup work has finished.
pub fn run(config: &ServerConfig) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let http_state = web::Data::new(build_http_state(config)?);
    let health_state = web::Data::new(HealthState::new());

    let deps = AppDependencies {
        http_state,
        health_state: health_state.clone(),
        key: config.key.clone(),
        cookie_secure: config.cookie_secure,
        same_site: config.same_site,
    };

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(make_metrics());
        app
    })
    .bind(config.bind_addr)?
    .run();

    Ok((server, health_state))
}
