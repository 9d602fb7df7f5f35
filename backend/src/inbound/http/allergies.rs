//! Allergy handlers.
//!
//! Stored allergies feed the recipe generator as implicit dietary
//! restrictions; the CRUD surface itself is deliberately small.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::repo_errors::map_allergy_persistence_error;
use crate::domain::{Error, IngredientName};

use super::auth::ExtractedCredentials;
use super::error::ApiResult;
use super::state::HttpState;

/// Request body naming an ingredient.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllergyRequest {
    /// Ingredient name to avoid.
    pub name: String,
}

/// The caller's allergies.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllergiesResponse {
    /// Ingredient names, in insertion order.
    pub allergies: Vec<String>,
}

fn parse_name(raw: &str) -> Result<IngredientName, Error> {
    IngredientName::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// List the caller's allergies.
#[utoipa::path(
    get,
    path = "/api/v1/allergies",
    responses(
        (status = 200, description = "Stored allergies", body = AllergiesResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["allergies"],
    operation_id = "listAllergies"
)]
#[get("/allergies")]
pub async fn list_allergies(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
) -> ApiResult<web::Json<AllergiesResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let allergies = state
        .allergies
        .list_for(user.id())
        .await
        .map_err(map_allergy_persistence_error)?;
    Ok(web::Json(AllergiesResponse {
        allergies: allergies.into_iter().map(String::from).collect(),
    }))
}

/// Record an allergy; re-adding an existing name is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/allergies",
    request_body = AllergyRequest,
    responses(
        (status = 201, description = "Allergy recorded", body = AllergiesResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["allergies"],
    operation_id = "addAllergy"
)]
#[post("/allergies")]
pub async fn add_allergy(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<AllergyRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let name = parse_name(&payload.name)?;
    state
        .allergies
        .add(user.id(), &name)
        .await
        .map_err(map_allergy_persistence_error)?;
    let allergies = state
        .allergies
        .list_for(user.id())
        .await
        .map_err(map_allergy_persistence_error)?;
    Ok(HttpResponse::Created().json(AllergiesResponse {
        allergies: allergies.into_iter().map(String::from).collect(),
    }))
}

/// Remove an allergy.
#[utoipa::path(
    delete,
    path = "/api/v1/allergies",
    request_body = AllergyRequest,
    responses(
        (status = 204, description = "Allergy removed"),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Allergy not stored", body = crate::inbound::http::ApiError)
    ),
    tags = ["allergies"],
    operation_id = "removeAllergy"
)]
#[delete("/allergies")]
pub async fn remove_allergy(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<AllergyRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let name = parse_name(&payload.name)?;
    let removed = state
        .allergies
        .remove(user.id(), &name)
        .await
        .map_err(map_allergy_persistence_error)?;
    if !removed {
        return Err(Error::not_found("allergy not stored").into());
    }
    Ok(HttpResponse::NoContent().finish())
}
