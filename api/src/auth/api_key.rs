//! Admin API key authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Hex-encoded SHA-256 digest of an API key
pub fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Admin middleware
///
/// Every route behind it requires the configured admin key. With no key
/// configured the routes are closed.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_api_key_hash.as_deref() else {
        tracing::warn!(path = %request.uri().path(), "Write refused: no admin key configured");
        return Err(AppError::Unauthorized);
    };

    let api_key = extract_api_key(&request).ok_or(AppError::Unauthorized)?;

    if hash_api_key(api_key) != expected {
        tracing::warn!(path = %request.uri().path(), "Write refused: wrong admin key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
