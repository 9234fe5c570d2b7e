use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use menu_catalog::{Category, PricedProduct, Restaurant};
use menu_core::ProductFilter;
use serde::Deserialize;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

/// Boolean filters are only on when the value is exactly `true`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub category_id: Option<i64>,
    pub featured: Option<String>,
    pub discounted: Option<String>,
    pub happy_hour: Option<String>,
}

impl From<ProductListQuery> for ProductFilter {
    fn from(query: ProductListQuery) -> Self {
        let enabled = |flag: Option<String>| flag.as_deref() == Some("true");
        Self {
            category_id: query.category_id,
            featured: enabled(query.featured),
            discounted: enabled(query.discounted),
            happy_hour: enabled(query.happy_hour),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route("/restaurants/{restaurant_id}", get(get_restaurant))
        .route("/restaurants/{restaurant_id}/categories", get(list_categories))
        .route("/restaurants/{restaurant_id}/products", get(list_products))
        .route("/restaurants/{restaurant_id}/products/{product_id}", get(get_product))
}

// ============================================================================
// Public Menu Handlers
// ============================================================================

/// GET /api/restaurants
async fn list_restaurants(State(state): State<AppState>) -> Result<Json<Vec<Restaurant>>, AppError> {
    Ok(Json(state.restaurants.list_restaurants().await?))
}

/// GET /api/restaurants/:restaurant_id
async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<Restaurant>, AppError> {
    let restaurant = state
        .restaurants
        .get_restaurant(restaurant_id)
        .await?
        .ok_or_else(|| AppError::not_found("restaurant_not_found"))?;

    Ok(Json(restaurant))
}

/// GET /api/restaurants/:restaurant_id/categories
async fn list_categories(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.categories.list_categories(restaurant_id).await?))
}

/// GET /api/restaurants/:restaurant_id/products
/// Every row is priced against the same "now"
async fn list_products(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<PricedProduct>>, AppError> {
    let filter = ProductFilter::from(query);
    let products = state.products.list_products(restaurant_id, &filter).await?;

    Ok(Json(state.pricing.price_all(products)))
}

/// GET /api/restaurants/:restaurant_id/products/:product_id
async fn get_product(
    State(state): State<AppState>,
    Path((restaurant_id, product_id)): Path<(i64, i64)>,
) -> Result<Json<PricedProduct>, AppError> {
    let product = state
        .products
        .get_product(restaurant_id, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("product_not_found"))?;

    Ok(Json(state.pricing.price(product)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_literal_true_enables_filters() {
        let query = ProductListQuery {
            category_id: Some(3),
            featured: Some("true".to_string()),
            discounted: Some("1".to_string()),
            happy_hour: None,
        };

        let filter = ProductFilter::from(query);
        assert_eq!(filter.category_id, Some(3));
        assert!(filter.featured);
        assert!(!filter.discounted);
        assert!(!filter.happy_hour);
    }
}
