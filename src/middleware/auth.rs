use crate::{auth::verify_jwt, error::AppError, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Identity attached to requests that pass the internal gate.
#[derive(Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Compare a caller-supplied secret against the configured value without
/// leaking the mismatch position through timing.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Internal trust domain: a valid bearer token and the shared secret
/// header, both mandatory. The token is checked first.
pub async fn internal_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Authentication required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Authentication required".to_string()))?;

    let claims = verify_jwt(token, &state.config.jwt_secret)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Authentication("Authentication required".to_string()))?;

    let secret_key = req
        .headers()
        .get("x-secret-key")
        .and_then(|header| header.to_str().ok())
        .unwrap_or_default();
    if !secrets_match(secret_key, &state.config.notification_secret) {
        return Err(AppError::InvalidSecretKey);
    }

    req.extensions_mut().insert(AuthUser {
        id: user_id,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

/// External trust domain: a static API key and no identity.
pub async fn external_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = req
        .headers()
        .get("x-api-key")
        .and_then(|header| header.to_str().ok())
        .unwrap_or_default();
    if !secrets_match(api_key, &state.config.external_api_key) {
        return Err(AppError::InvalidApiKey);
    }

    Ok(next.run(req).await)
}
