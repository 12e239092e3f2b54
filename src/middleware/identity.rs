use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Local user resolved from the request's identity token
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Validates the bearer token and maps its identity onto a local user.
///
/// Requests without a token pass through anonymously. A token that fails
/// validation is rejected with 401. When the token is valid but user sync
/// fails, the request continues unauthenticated; sync is reconciliation,
/// not the source of truth for authentication.
pub async fn identity_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = match extract_bearer(request.headers()) {
        Ok(Some(token)) => token,
        Ok(None) => return next.run(request).await,
        Err(msg) => return ApiError::unauthorized(msg).into_response(),
    };

    let assertion = match auth::decode_assertion(&token, &state.jwt_secret) {
        Ok(assertion) => assertion,
        Err(e) => {
            tracing::warn!("Rejected identity token: {}", e);
            return ApiError::unauthorized(e.to_string()).into_response();
        }
    };

    match state.sync.resolve(&assertion).await {
        Ok(user) if user.is_active => {
            tracing::debug!("Request authenticated as {} ({})", user.username, user.role);
            request.extensions_mut().insert(CurrentUser(user));
        }
        Ok(user) => {
            tracing::warn!("User {} is inactive; continuing unauthenticated", user.id);
        }
        Err(e) => {
            tracing::warn!("Identity sync failed, continuing unauthenticated: {}", e);
        }
    }

    next.run(request).await
}

/// `Ok(None)` when there is no Authorization header at all
fn extract_bearer(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
