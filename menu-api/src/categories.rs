use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::{error::AppError, extract::JsonBody, middleware::Owner, non_empty, state::AppState, CreatedResponse, StatusResponse};

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(rename_category).delete(delete_category))
}

/// POST /api/categories
async fn create_category(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let name = non_empty(req.name).ok_or_else(|| AppError::bad_request("missing_name"))?;

    let id = state.categories.create_category(owner.id, &name).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/categories/:id
async fn rename_category(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(category_id): Path<i64>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let name = non_empty(req.name).ok_or_else(|| AppError::bad_request("missing_name"))?;

    if !state.categories.rename_category(owner.id, category_id, &name).await? {
        return Err(AppError::not_found("category_not_found"));
    }

    Ok(Json(StatusResponse::updated()))
}

/// DELETE /api/categories/:id
/// Products in the category stay, uncategorized
async fn delete_category(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.categories.delete_category(owner.id, category_id).await? {
        return Err(AppError::not_found("category_not_found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
