//! LLM-assisted recipe generation handler.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::GenerationRequest;

use super::auth::ExtractedCredentials;
use super::error::ApiResult;
use super::recipes::RecipeResponse;
use super::state::HttpState;

/// Request body for `POST /api/v1/generate-recipe`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecipeRequest {
    /// Free-text question for the generator.
    pub question: String,
    /// Ingredients the recipe should use.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Explicit dietary restrictions; stored allergies are added on top.
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

/// Generate a recipe via the completion provider and store it.
///
/// The stored recipe is returned; provider failures and unusable replies
/// surface as a 502 dependency failure, never as a validation error.
#[utoipa::path(
    post,
    path = "/api/v1/generate-recipe",
    request_body = GenerateRecipeRequest,
    responses(
        (status = 201, description = "Generated recipe stored", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 502, description = "Provider failed", body = crate::inbound::http::ApiError)
    ),
    tags = ["recipes"],
    operation_id = "generateRecipe"
)]
#[post("/generate-recipe")]
pub async fn generate_recipe(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<GenerateRecipeRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let payload = payload.into_inner();
    let request = GenerationRequest::try_from_parts(
        &payload.question,
        payload.ingredients,
        payload.dietary_restrictions,
    )?;

    let recipe = state.generator.generate(user.id(), &request).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}
