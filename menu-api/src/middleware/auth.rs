use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OwnerClaims {
    /// User id of the restaurant owner
    pub sub: String,
    pub exp: usize,
}

/// The authenticated restaurant owner, injected by [`require_owner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub id: i64,
}

// ============================================================================
// Owner Authentication Middleware
// ============================================================================

pub async fn require_owner(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("missing_token"))?;

    // 2. Decode and validate JWT
    let token_data = decode::<OwnerClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::unauthorized("invalid_token")
    })?;

    // 3. Resolve the owner
    let id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::unauthorized("invalid_token"))?;

    // 4. Inject into request extensions
    req.extensions_mut().insert(Owner { id });

    Ok(next.run(req).await)
}
