use crate::{
    error::{AppError, Result},
    middleware::auth::secrets_match,
    state::AppState,
};

use super::auth_dto::{LoginRequest, LoginResponse};
use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Invalid secret key")
    ),
    security(("secret_key" = [])),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    // Field check first, then the shared secret, then credentials. The
    // dashboard relies on this order to tell form errors apart from a
    // misconfigured deployment.
    payload
        .validate()
        .map_err(|_| AppError::Validation("Username and password are required".to_string()))?;

    let secret_key = headers
        .get("x-secret-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !secrets_match(secret_key, &state.config.notification_secret) {
        return Err(AppError::InvalidSecretKey);
    }

    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let (user, token) = state.auth_service.login(&username, &password).await?;

    tracing::info!("user '{}' logged in", user.username);

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: user.into(),
    }))
}
