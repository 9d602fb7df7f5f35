//! Credential extraction for protected handlers.
//!
//! [`ExtractedCredentials`] pulls both supported credential shapes off the
//! request, the `Authorization: Bearer` header and the signed session
//! cookie, without judging them. Resolution (and the uniform 401) happens
//! in the domain's [`AuthGate`](crate::domain::AuthGate).

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::RequestCredentials;

use super::session::SessionContext;

/// Raw credentials found on one request.
///
/// Handlers pass this straight to the auth gate:
///
/// ```text
/// let user = state.gate.resolve(&credentials).await?;
/// ```
pub struct ExtractedCredentials(pub RequestCredentials);

impl ExtractedCredentials {
    /// The extracted credential pair.
    pub fn into_inner(self) -> RequestCredentials {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}

impl FromRequest for ExtractedCredentials {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let bearer = bearer_token(req);
        let session_fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session_fut.await?;
            // An unreadable or tampered session is simply "no session";
            // the gate turns the absence into a uniform 401.
            let session_user = session.user_id().ok().flatten();
            Ok(Self(RequestCredentials {
                bearer,
                session_user,
            }))
        })
    }
}
