//! Recipe CRUD handlers, all owner-scoped.
//!
//! A recipe that does not exist and a recipe owned by someone else produce
//! the same 404; existence is never leaked across accounts.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::repo_errors::map_recipe_persistence_error;
use crate::domain::{Error, Recipe, RecipeDraft, RecipeId, RecipeValidationError};

use super::auth::ExtractedCredentials;
use super::error::ApiResult;
use super::state::HttpState;

/// Request body for creating or updating a recipe.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    /// Recipe title.
    pub title: String,
    /// Free-text body.
    #[serde(default)]
    pub content: String,
    /// Ingredient names; duplicates are collapsed.
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Recipe representation returned by the API.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    /// Stable identifier.
    pub id: String,
    /// Owning user id.
    pub owner_id: String,
    /// Recipe title.
    pub title: String,
    /// Free-text body.
    pub content: String,
    /// Whether the recipe is on the public feed.
    pub public: bool,
    /// Ingredient names.
    pub ingredients: Vec<String>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().to_string(),
            owner_id: recipe.owner().to_string(),
            title: recipe.title().to_string(),
            content: recipe.content().to_owned(),
            public: recipe.is_public(),
            ingredients: recipe
                .ingredients()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

fn map_recipe_validation_error(err: &RecipeValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

/// Parse a path id; an unparseable id cannot name any recipe, so it is a 404.
pub(super) fn parse_recipe_id(raw: &str) -> Result<RecipeId, Error> {
    RecipeId::new(raw).map_err(|_| Error::not_found("recipe not found"))
}

/// List the caller's recipes.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    responses(
        (status = 200, description = "The caller's recipes", body = [RecipeResponse]),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let recipes = state
        .recipes
        .list_for_owner(user.id())
        .await
        .map_err(map_recipe_persistence_error)?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

/// Create a recipe. New recipes start private.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let payload = payload.into_inner();
    let draft = RecipeDraft::try_from_parts(&payload.title, &payload.content, &payload.ingredients)
        .map_err(|err| map_recipe_validation_error(&err))?;

    let recipe = Recipe::from_draft(*user.id(), &draft);
    state
        .recipes
        .insert(&recipe)
        .await
        .map_err(map_recipe_persistence_error)?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

/// Fetch one of the caller's recipes.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "The recipe", body = RecipeResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_recipe_id(&path)?;
    let recipe = state
        .recipes
        .find_for_owner(&id, user.id())
        .await
        .map_err(map_recipe_persistence_error)?
        .ok_or_else(|| Error::not_found("recipe not found"))?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Update one of the caller's recipes.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[put("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_recipe_id(&path)?;
    let payload = payload.into_inner();
    let draft = RecipeDraft::try_from_parts(&payload.title, &payload.content, &payload.ingredients)
        .map_err(|err| map_recipe_validation_error(&err))?;

    let mut recipe = state
        .recipes
        .find_for_owner(&id, user.id())
        .await
        .map_err(map_recipe_persistence_error)?
        .ok_or_else(|| Error::not_found("recipe not found"))?;

    recipe.apply_draft(&draft);
    state
        .recipes
        .update(&recipe)
        .await
        .map_err(map_recipe_persistence_error)?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Delete one of the caller's recipes along with its ingredient rows.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_recipe_id(&path)?;

    // Ownership check first so foreign recipes 404 without being touched.
    state
        .recipes
        .find_for_owner(&id, user.id())
        .await
        .map_err(map_recipe_persistence_error)?
        .ok_or_else(|| Error::not_found("recipe not found"))?;

    state
        .recipes
        .delete(&id)
        .await
        .map_err(map_recipe_persistence_error)?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::http::header;
    use actix_web::test;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{signup, test_app, test_state};

    #[actix_web::test]
    async fn list_starts_empty_then_reflects_creation() {
        let state = test_state();
        let app = test::init_service(test_app(state)).await;
        let token = signup(&app, "u@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, serde_json::json!([]));

        let create = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({ "title": "T", "content": "C" }))
                .to_request(),
        )
        .await;
        assert_eq!(create.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        let titles: Vec<&str> = body
            .as_array()
            .expect("array body")
            .iter()
            .filter_map(|r| r.get("title").and_then(Value::as_str))
            .collect();
        assert_eq!(titles, vec!["T"]);
    }

    #[actix_web::test]
    async fn unauthenticated_requests_are_rejected() {
        let app = test::init_service(test_app(test_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/recipes").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/recipes")
                .set_json(serde_json::json!({ "title": "T", "content": "C" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn foreign_recipes_are_indistinguishable_from_missing_ones() {
        let app = test::init_service(test_app(test_state())).await;
        let owner_token = signup(&app, "owner@example.com").await;
        let other_token = signup(&app, "other@example.com").await;

        let create = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {owner_token}")))
                .set_json(serde_json::json!({ "title": "T", "content": "C" }))
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(create).await;
        let id = created.get("id").and_then(Value::as_str).expect("id");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/recipes/{id}"))
                .insert_header((header::AUTHORIZATION, format!("Bearer {other_token}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/recipes/not-a-uuid")
                .insert_header((header::AUTHORIZATION, format!("Bearer {other_token}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_replaces_title_content_and_ingredients() {
        let app = test::init_service(test_app(test_state())).await;
        let token = signup(&app, "u@example.com").await;

        let create = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({
                    "title": "T", "content": "C", "ingredients": ["Salt"]
                }))
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(create).await;
        let id = created.get("id").and_then(Value::as_str).expect("id");

        let update = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/recipes/{id}"))
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({
                    "title": "T2", "content": "C2", "ingredients": ["Pepper"]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(update.status(), StatusCode::OK);
        let body: Value = test::read_body_json(update).await;
        assert_eq!(body.get("title"), Some(&serde_json::json!("T2")));
        assert_eq!(
            body.get("ingredients"),
            Some(&serde_json::json!(["Pepper"]))
        );
    }

    #[actix_web::test]
    async fn delete_removes_the_recipe() {
        let app = test::init_service(test_app(test_state())).await;
        let token = signup(&app, "u@example.com").await;

        let create = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({ "title": "T", "content": "C" }))
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(create).await;
        let id = created.get("id").and_then(Value::as_str).expect("id");

        let delete = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/recipes/{id}"))
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(delete.status(), StatusCode::NO_CONTENT);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/recipes/{id}"))
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
