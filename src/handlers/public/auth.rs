use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub capabilities: Vec<String>,
}

/// POST /auth/login - sign in through the identity provider
pub async fn login_post(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let user = state.accounts.login(&body.email, &body.password).await?;
    let capabilities = state.catalog.capabilities_of(&user.role).into_iter().collect();

    Ok(ApiResponse::success(LoginResponse { user, capabilities }))
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetResponse {
    pub message: &'static str,
}

/// POST /auth/password-reset - always 202, whether or not the account exists
pub async fn password_reset_post(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> ApiResponse<PasswordResetResponse> {
    state.accounts.request_password_reset(&body.email).await;

    ApiResponse::accepted(PasswordResetResponse {
        message: "If an account exists for this email, a reset link has been sent",
    })
}
