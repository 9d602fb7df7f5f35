//! Account API handlers: signup, login, logout.
//!
//! ```text
//! POST /api/v1/signup {"email":"u@example.com","password":"pw123","name":"U"}
//! POST /api/v1/login  {"email":"u@example.com","password":"pw123"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AuthMode, AuthValidationError, Credentials, Error, IssuedCredentials, Role, SignupDetails,
};

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Signup request body for `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Unique login email.
    pub email: String,
    /// Plaintext password; hashed before anything is stored.
    pub password: String,
    /// Display name shown to other users.
    pub name: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Registered login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Body returned by signup and login.
///
/// Bearer deployments carry the token in the body; cookie deployments set
/// the session cookie instead and omit the token.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed bearer token (bearer deployments only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// `"bearer"` or `"session"`.
    pub token_type: String,
    /// The account's role label.
    pub role: Role,
}

fn map_auth_validation_error(err: &AuthValidationError) -> Error {
    let field = match err {
        AuthValidationError::Email(_) => "email",
        AuthValidationError::EmptyPassword => "password",
        AuthValidationError::DisplayName(_) => "name",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Issue the response for a fresh authentication, honouring the auth mode.
fn respond_with_credentials(
    session: &SessionContext,
    mode: AuthMode,
    issued: &IssuedCredentials,
) -> Result<AuthResponse, Error> {
    match mode {
        AuthMode::Bearer => Ok(AuthResponse {
            token: Some(issued.token.clone()),
            token_type: "bearer".to_owned(),
            role: issued.user.role(),
        }),
        AuthMode::CookieSession => {
            session.persist_user(issued.user.id())?;
            Ok(AuthResponse {
                token: None,
                token_type: "session".to_owned(),
                role: issued.user.role(),
            })
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 409, description = "Email already registered", body = crate::inbound::http::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let details = SignupDetails::try_from_parts(&payload.email, &payload.password, &payload.name)
        .map_err(|err| map_auth_validation_error(&err))?;

    let issued = state.accounts.signup(&details).await?;
    let body = respond_with_credentials(&session, state.auth_mode(), &issued)?;
    Ok(HttpResponse::Created().json(body))
}

/// Authenticate an existing account.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| map_auth_validation_error(&err))?;

    let issued = state.accounts.login(&credentials).await?;
    let body = respond_with_credentials(&session, state.auth_mode(), &issued)?;
    Ok(HttpResponse::Ok().json(body))
}

/// End the caller's session.
///
/// Cookie deployments clear the server-tracked session; bearer deployments
/// have nothing to revoke, the client simply discards its token.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Logged out")
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(json!({ "message": "logged out" }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{test_app, test_state};

    fn signup_body(email: &str, password: &str, name: &str) -> Value {
        serde_json::json!({ "email": email, "password": password, "name": name })
    }

    #[actix_web::test]
    async fn signup_returns_a_bearer_token_and_role() {
        let app = test::init_service(test_app(test_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(signup_body("u@example.com", "pw123", "U"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("tokenType"), Some(&serde_json::json!("bearer")));
        assert_eq!(body.get("role"), Some(&serde_json::json!("member")));
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .expect("token present");
        assert!(!token.is_empty());
    }

    #[actix_web::test]
    async fn duplicate_signup_conflicts() {
        let app = test::init_service(test_app(test_state())).await;
        let payload = signup_body("u@example.com", "pw123", "U");

        let first = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(second).await;
        assert_eq!(
            body.get("message"),
            Some(&serde_json::json!("email already registered"))
        );
    }

    #[actix_web::test]
    async fn signup_validation_reports_the_field() {
        let app = test::init_service(test_app(test_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(signup_body("not-an-email", "pw123", "U"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/field"),
            Some(&serde_json::json!("email"))
        );
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = test::init_service(test_app(test_state())).await;

        let signup = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(signup_body("u@example.com", "pw123", "U"))
                .to_request(),
        )
        .await;
        assert_eq!(signup.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(serde_json::json!({ "email": "u@example.com", "password": "wrong" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("message"),
            Some(&serde_json::json!("invalid email or password"))
        );
    }

    #[actix_web::test]
    async fn cookie_mode_sets_a_session_instead_of_a_token() {
        let harness = crate::inbound::http::test_utils::TestHarness::new();
        let app = test::init_service(test_app(harness.cookie_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(signup_body("u@example.com", "pw123", "U"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body: Value = test::read_body_json(res).await;
        assert!(body.get("token").is_none());
        assert_eq!(body.get("tokenType"), Some(&serde_json::json!("session")));
    }

    #[actix_web::test]
    async fn logout_always_succeeds() {
        let app = test::init_service(test_app(test_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
