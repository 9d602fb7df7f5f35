//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated OpenAPI specification for the REST
//! API. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with both credential schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login in cookie deployments.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ladle backend API",
        description = "HTTP interface for accounts, recipes, shopping lists, and the social feed."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::shopping_list::get_shopping_list,
        crate::inbound::http::shopping_list::replace_shopping_list,
        crate::inbound::http::shopping_list::export_shopping_list,
        crate::inbound::http::shopping_list::add_recipe_to_shopping_list,
        crate::inbound::http::social::publish_recipe,
        crate::inbound::http::social::list_posts,
        crate::inbound::http::social::like_post,
        crate::inbound::http::social::unlike_post,
        crate::inbound::http::social::add_bookmark,
        crate::inbound::http::social::list_bookmarks,
        crate::inbound::http::social::add_comment,
        crate::inbound::http::social::list_comments,
        crate::inbound::http::allergies::list_allergies,
        crate::inbound::http::allergies::add_allergy,
        crate::inbound::http::allergies::remove_allergy,
        crate::inbound::http::generate::generate_recipe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::ErrorCode,
        crate::domain::user::Role,
        crate::inbound::http::ApiError,
        crate::inbound::http::accounts::SignupRequest,
        crate::inbound::http::accounts::LoginRequest,
        crate::inbound::http::accounts::AuthResponse,
        crate::inbound::http::recipes::RecipeRequest,
        crate::inbound::http::recipes::RecipeResponse,
        crate::inbound::http::shopping_list::ReplaceShoppingListRequest,
        crate::inbound::http::shopping_list::ShoppingListResponse,
        crate::inbound::http::social::RecipeIdRequest,
        crate::inbound::http::social::CommentRequest,
        crate::inbound::http::social::PostResponse,
        crate::inbound::http::social::FeedEntry,
        crate::inbound::http::social::LikeResponse,
        crate::inbound::http::social::CommentResponse,
        crate::inbound::http::allergies::AllergyRequest,
        crate::inbound::http::allergies::AllergiesResponse,
        crate::inbound::http::generate::GenerateRecipeRequest,
    )),
    tags(
        (name = "accounts", description = "Signup, login, and logout"),
        (name = "recipes", description = "Owner-scoped recipe CRUD and generation"),
        (name = "shopping-list", description = "Per-user shopping list"),
        (name = "posts", description = "Public feed, likes, and comments"),
        (name = "bookmarks", description = "Recipe bookmarks"),
        (name = "allergies", description = "Stored allergies"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn every_api_path_is_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/signup",
            "/api/v1/login",
            "/api/v1/recipes",
            "/api/v1/recipes/{id}",
            "/api/v1/recipes/{id}/shopping-list",
            "/api/v1/shopping-list",
            "/api/v1/shopping-list/export",
            "/api/v1/posts",
            "/api/v1/posts/{id}/like",
            "/api/v1/posts/{id}/comments",
            "/api/v1/bookmarks",
            "/api/v1/allergies",
            "/api/v1/generate-recipe",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn both_security_schemes_are_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("BearerToken"));
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
