//! Shopping-list handlers: merge from a recipe, view, replace, export.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::IngredientName;

use super::auth::ExtractedCredentials;
use super::error::ApiResult;
use super::recipes::parse_recipe_id;
use super::state::HttpState;

/// Request body for replacing the shopping list.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceShoppingListRequest {
    /// The new list, one entry per item; duplicates are kept.
    pub items: Vec<String>,
}

/// Shopping list returned by the API, in list order.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListResponse {
    /// Ingredient names, duplicates included.
    pub items: Vec<String>,
}

fn to_response(items: Vec<IngredientName>) -> ShoppingListResponse {
    ShoppingListResponse {
        items: items.into_iter().map(String::from).collect(),
    }
}

/// The caller's shopping list.
#[utoipa::path(
    get,
    path = "/api/v1/shopping-list",
    responses(
        (status = 200, description = "The caller's list", body = ShoppingListResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["shopping-list"],
    operation_id = "getShoppingList"
)]
#[get("/shopping-list")]
pub async fn get_shopping_list(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
) -> ApiResult<web::Json<ShoppingListResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let items = state.shopping_list.list(user.id()).await?;
    Ok(web::Json(to_response(items)))
}

/// Merge a recipe's ingredients into the caller's list.
///
/// Idempotent: names already on the list are not added again.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping-list",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Resulting list", body = ShoppingListResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Recipe not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["shopping-list"],
    operation_id = "addRecipeToShoppingList"
)]
#[post("/recipes/{id}/shopping-list")]
pub async fn add_recipe_to_shopping_list(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
) -> ApiResult<web::Json<ShoppingListResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let recipe_id = parse_recipe_id(&path)?;
    let items = state
        .shopping_list
        .add_recipe_ingredients(user.id(), &recipe_id)
        .await?;
    Ok(web::Json(to_response(items)))
}

/// Replace the caller's list verbatim.
///
/// Not idempotent under duplicate input: submitting `["Milk","Milk"]`
/// stores two entries.
#[utoipa::path(
    put,
    path = "/api/v1/shopping-list",
    request_body = ReplaceShoppingListRequest,
    responses(
        (status = 200, description = "Stored list", body = ShoppingListResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["shopping-list"],
    operation_id = "replaceShoppingList"
)]
#[put("/shopping-list")]
pub async fn replace_shopping_list(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<ReplaceShoppingListRequest>,
) -> ApiResult<web::Json<ShoppingListResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let items = state
        .shopping_list
        .replace(user.id(), &payload.into_inner().items)
        .await?;
    Ok(web::Json(to_response(items)))
}

/// Download the list as a plain-text file.
#[utoipa::path(
    get,
    path = "/api/v1/shopping-list/export",
    responses(
        (status = 200, description = "Plain-text list", content_type = "text/plain"),
        (status = 400, description = "List is empty", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["shopping-list"],
    operation_id = "exportShoppingList"
)]
#[get("/shopping-list/export")]
pub async fn export_shopping_list(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let text = state.shopping_list.export(user.id()).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=shopping_list.txt",
        ))
        .body(text))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::http::header;
    use actix_web::test;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{signup, test_app, test_state};

    async fn create_recipe<S>(app: &S, token: &str, ingredients: &[&str]) -> String
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
                .uri("/api/v1/recipes")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({
                    "title": "Pancakes",
                    "content": "Mix and fry.",
                    "ingredients": ingredients,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        body.get("id")
            .and_then(Value::as_str)
            .expect("id")
            .to_owned()
    }

    #[actix_web::test]
    async fn merging_a_recipe_twice_adds_nothing_new() {
        let app = test::init_service(test_app(test_state())).await;
        let token = signup(&app, "u@example.com").await;
        let recipe_id = create_recipe(&app, &token, &["Flour", "Milk"]).await;

        for _ in 0..2 {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("/api/v1/recipes/{recipe_id}/shopping-list"))
                    .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body.get("items"), Some(&serde_json::json!(["Flour", "Milk"])));
        }
    }

    #[actix_web::test]
    async fn replace_keeps_duplicates() {
        let app = test::init_service(test_app(test_state())).await;
        let token = signup(&app, "u@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/shopping-list")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({ "items": ["Milk", "Milk"] }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("items"), Some(&serde_json::json!(["Milk", "Milk"])));
    }

    #[actix_web::test]
    async fn export_streams_plain_text_or_rejects_an_empty_list() {
        let app = test::init_service(test_app(test_state())).await;
        let token = signup(&app, "u@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/shopping-list/export")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let seed = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/shopping-list")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({ "items": ["Milk", "Eggs"] }))
                .to_request(),
        )
        .await;
        assert_eq!(seed.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/shopping-list/export")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("attachment header")
            .to_str()
            .expect("ascii header");
        assert!(disposition.contains("shopping_list.txt"));
        let body = test::read_body(res).await;
        assert_eq!(body, "Milk\nEggs");
    }

    #[actix_web::test]
    async fn unauthenticated_replace_stores_nothing() {
        let state = test_state();
        let shopping = state.shopping_list.clone();
        let app = test::init_service(test_app(state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/shopping-list")
                .set_json(serde_json::json!({ "items": ["Milk"] }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        // No list was touched for any user.
        let probe = crate::domain::UserId::random();
        let items = shopping.list(&probe).await.expect("list");
        assert!(items.is_empty());
    }
}
