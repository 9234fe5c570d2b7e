use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post, put},
    Extension, Json, Router,
};
use menu_catalog::{DEFAULT_HAPPY_HOUR_END, DEFAULT_HAPPY_HOUR_START};
use menu_core::{HappyHourPatch, NewProduct, ProductPatch};
use serde::Deserialize;

use crate::{error::AppError, extract::JsonBody, middleware::Owner, non_empty, state::AppState, CreatedResponse, StatusResponse};

// ============================================================================
// Request Types
// ============================================================================

/// Body for both create and update. On update, absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub is_featured: Option<bool>,
    pub discount_percent: Option<i64>,
    pub happy_hour_enabled: Option<bool>,
    pub happy_hour_discount_percent: Option<i64>,
    pub happy_hour_start: Option<String>,
    pub happy_hour_end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub discount_percent: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HappyHourRequest {
    pub enabled: Option<bool>,
    pub discount_percent: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl From<HappyHourRequest> for HappyHourPatch {
    fn from(req: HappyHourRequest) -> Self {
        Self {
            enabled: req.enabled,
            discount_percent: req.discount_percent,
            start: non_empty(req.start),
            end: non_empty(req.end),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/discount", patch(set_discount))
        .route("/products/{id}/happy-hour", patch(update_happy_hour))
}

// ============================================================================
// Product Management Handlers
// ============================================================================

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let (Some(name), Some(price)) = (non_empty(req.name), req.price) else {
        return Err(AppError::bad_request("missing_fields"));
    };

    ensure_category(&state, owner, req.category_id).await?;

    let product = NewProduct {
        category_id: req.category_id,
        name,
        description: non_empty(req.description),
        price,
        is_featured: req.is_featured.unwrap_or(false),
        discount_percent: req.discount_percent.unwrap_or(0),
        happy_hour_enabled: req.happy_hour_enabled.unwrap_or(false),
        happy_hour_discount_percent: req.happy_hour_discount_percent.unwrap_or(0),
        happy_hour_start: non_empty(req.happy_hour_start)
            .unwrap_or_else(|| DEFAULT_HAPPY_HOUR_START.to_string()),
        happy_hour_end: non_empty(req.happy_hour_end)
            .unwrap_or_else(|| DEFAULT_HAPPY_HOUR_END.to_string()),
    };

    let id = state.products.create_product(owner.id, &product).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/products/:id
async fn update_product(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(product_id): Path<i64>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    ensure_category(&state, owner, req.category_id).await?;

    let patch = ProductPatch {
        name: non_empty(req.name),
        description: non_empty(req.description),
        price: req.price,
        category_id: req.category_id,
        is_featured: req.is_featured,
        discount_percent: req.discount_percent,
        happy_hour_enabled: req.happy_hour_enabled,
        happy_hour_discount_percent: req.happy_hour_discount_percent,
        happy_hour_start: non_empty(req.happy_hour_start),
        happy_hour_end: non_empty(req.happy_hour_end),
    };

    if !state.products.update_product(owner.id, product_id, &patch).await? {
        return Err(AppError::not_found("product_not_found"));
    }

    Ok(Json(StatusResponse::updated()))
}

/// DELETE /api/products/:id
async fn delete_product(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.products.delete_product(owner.id, product_id).await? {
        return Err(AppError::not_found("product_not_found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/products/:id/discount
async fn set_discount(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(product_id): Path<i64>,
    JsonBody(req): JsonBody<DiscountRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let discount_percent = req
        .discount_percent
        .ok_or_else(|| AppError::bad_request("missing_discount"))?;

    if !state.products.set_discount(owner.id, product_id, discount_percent).await? {
        return Err(AppError::not_found("product_not_found"));
    }

    Ok(Json(StatusResponse::updated()))
}

/// PATCH /api/products/:id/happy-hour
async fn update_happy_hour(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(product_id): Path<i64>,
    JsonBody(req): JsonBody<HappyHourRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let patch = HappyHourPatch::from(req);
    if patch.is_empty() {
        return Err(AppError::bad_request("no_updates"));
    }

    if !state.products.update_happy_hour(owner.id, product_id, &patch).await? {
        return Err(AppError::not_found("product_not_found"));
    }

    Ok(Json(StatusResponse::updated()))
}

/// A product may only be filed under one of its owner's categories.
async fn ensure_category(state: &AppState, owner: Owner, category_id: Option<i64>) -> Result<(), AppError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    if !state.categories.category_owned_by(owner.id, category_id).await? {
        return Err(AppError::bad_request("invalid_category"));
    }

    Ok(())
}
