use std::sync::Arc;
use menu_catalog::PricingEngine;
use menu_core::repository::{CategoryRepository, ProductRepository, RestaurantRepository};
use menu_store::{DbClient, StoreCategoryRepository, StoreProductRepository, StoreRestaurantRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub pricing: PricingEngine,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wire the SQLite repositories over one shared pool.
    pub fn new(db: &DbClient, auth: AuthConfig, pricing: PricingEngine) -> Self {
        Self {
            restaurants: Arc::new(StoreRestaurantRepository::new(db.pool.clone())),
            categories: Arc::new(StoreCategoryRepository::new(db.pool.clone())),
            products: Arc::new(StoreProductRepository::new(db.pool.clone())),
            pricing,
            auth,
        }
    }
}
