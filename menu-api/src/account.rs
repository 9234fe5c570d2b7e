use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use menu_core::AccountPatch;
use menu_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::{auth::hash_password, error::AppError, extract::JsonBody, middleware::Owner, non_empty, state::AppState, StatusResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub restaurant_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub restaurant_name: Option<String>,
    pub password: Option<Masked<String>>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(get_account).put(update_account).delete(delete_account))
}

/// GET /api/me
async fn get_account(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state
        .restaurants
        .get_account(owner.id)
        .await?
        .ok_or_else(|| AppError::not_found("user_not_found"))?;

    Ok(Json(AccountResponse {
        id: account.id,
        email: account.email,
        restaurant_name: account.restaurant_name,
    }))
}

/// PUT /api/me
/// Update any of email, restaurant name, password
async fn update_account(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    JsonBody(req): JsonBody<UpdateAccountRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    if state.restaurants.get_account(owner.id).await?.is_none() {
        return Err(AppError::not_found("user_not_found"));
    }

    let email = non_empty(req.email);
    if let Some(email) = &email {
        if state.restaurants.email_taken(email, Some(owner.id)).await? {
            return Err(AppError::conflict("email_in_use"));
        }
    }

    let mut patch = AccountPatch {
        email,
        restaurant_name: non_empty(req.restaurant_name),
        password_hash: None,
    };
    if let Some(password) = req.password.filter(|p| !p.is_blank()) {
        patch.password_hash = Some(hash_password(password, state.auth.bcrypt_cost).await?);
    }

    if patch.is_empty() {
        return Err(AppError::bad_request("no_updates"));
    }

    state.restaurants.update_account(owner.id, &patch).await?;
    Ok(Json(StatusResponse::updated()))
}

/// DELETE /api/me
/// Categories and products go with the account
async fn delete_account(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Result<StatusCode, AppError> {
    state.restaurants.delete_account(owner.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
