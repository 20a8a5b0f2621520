use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::server::error_mapping::{validation, ApiError};
use crate::server::{clear_session_cookie, session_cookie, session_token, AppContext};
use crate::service::ServiceError;

/// Body of the sign-in request: the credential from the identity provider.
#[derive(Debug, Deserialize)]
pub struct SignInBody {
    #[serde(rename = "idToken")]
    pub id_token: Option<String>,
}

/// Verify a credential and mint the session cookie.
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<SignInBody>,
) -> Result<Response, ApiError> {
    let Some(credential) = body.id_token.filter(|t| !t.trim().is_empty()) else {
        return Err(validation("idToken is required"));
    };

    let (token, claims) = ctx
        .sessions
        .sign_in(&credential)
        .await
        .map_err(|_| ApiError(ServiceError::Unauthorized))?;

    let cookie = session_cookie(&token, ctx.sessions.ttl_seconds());
    let body = Json(json!({
        "success": true,
        "user": { "uid": claims.uid, "email": claims.email }
    }));
    Ok(([(http::header::SET_COOKIE, cookie)], body).into_response())
}

/// Report whether the caller currently holds a valid session.
pub async fn status(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let token = session_token(&headers);
    match ctx.guard.authenticate(token.as_deref()).await {
        Ok(claims) => Json(json!({
            "authenticated": true,
            "user": { "uid": claims.uid, "email": claims.email }
        }))
        .into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        )
            .into_response(),
    }
}

/// Revoke the session and clear the cookie.
pub async fn destroy(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        ctx.sessions.revoke(&token).await;
    }
    (
        [(http::header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
