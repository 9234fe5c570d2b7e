use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use menu_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    extract::JsonBody,
    middleware::OwnerClaims,
    non_empty,
    state::{AppState, AuthConfig},
    CreatedResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<Masked<String>>,
    pub restaurant_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<Masked<String>>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i64,
    pub restaurant_name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let (Some(email), Some(password), Some(restaurant_name)) = (
        non_empty(req.email),
        req.password.filter(|p| !p.is_blank()),
        non_empty(req.restaurant_name),
    ) else {
        return Err(AppError::bad_request("missing_fields"));
    };

    if state.restaurants.email_taken(&email, None).await? {
        return Err(AppError::conflict("email_in_use"));
    }

    let password_hash = hash_password(password, state.auth.bcrypt_cost).await?;
    let id = state
        .restaurants
        .create_user(&email, password_hash.expose(), &restaurant_name)
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(email), Some(password)) = (non_empty(req.email), req.password.filter(|p| !p.is_blank())) else {
        return Err(AppError::bad_request("missing_fields"));
    };

    let user = state
        .restaurants
        .find_credentials(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid_credentials"))?;

    if !verify_password(password, user.password_hash).await? {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(AppError::unauthorized("invalid_credentials"));
    }

    let token = issue_token(&state.auth, user.id)?;

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            restaurant_name: user.restaurant_name,
        },
    }))
}

pub fn issue_token(auth: &AuthConfig, user_id: i64) -> Result<String, AppError> {
    let claims = OwnerClaims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

/// bcrypt is CPU-bound, so it runs off the async workers.
pub async fn hash_password(password: Masked<String>, cost: u32) -> Result<Masked<String>, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password.expose(), cost)).await??;
    Ok(Masked(hash))
}

async fn verify_password(password: Masked<String>, hash: Masked<String>) -> Result<bool, AppError> {
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password.expose(), hash.expose())).await??;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn auth_config() -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(&auth_config(), 42).unwrap();

        let data = decode::<OwnerClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "42");
        assert!(data.claims.exp > Utc::now().timestamp() as usize);
    }

    #[tokio::test]
    async fn test_password_hash_verifies() {
        let hash = hash_password(Masked("pa55word".to_string()), 4).await.unwrap();
        assert_ne!(hash.expose(), "pa55word");

        assert!(verify_password(Masked("pa55word".to_string()), hash.clone()).await.unwrap());
        assert!(!verify_password(Masked("wrong".to_string()), hash).await.unwrap());
    }
}
