use async_trait::async_trait;
use menu_catalog::{Account, Category, Product, Restaurant};

use crate::models::{AccountPatch, HappyHourPatch, NewProduct, ProductFilter, ProductPatch, UserCredentials};
use crate::CoreResult;

/// Repository trait for users, who double as restaurants
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        restaurant_name: &str,
    ) -> CoreResult<i64>;

    async fn find_credentials(&self, email: &str) -> CoreResult<Option<UserCredentials>>;

    /// True when another user (other than `except_id`) already owns `email`.
    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> CoreResult<bool>;

    async fn get_account(&self, id: i64) -> CoreResult<Option<Account>>;

    /// Returns false when the user does not exist.
    async fn update_account(&self, id: i64, patch: &AccountPatch) -> CoreResult<bool>;

    async fn delete_account(&self, id: i64) -> CoreResult<()>;

    async fn list_restaurants(&self) -> CoreResult<Vec<Restaurant>>;

    async fn get_restaurant(&self, id: i64) -> CoreResult<Option<Restaurant>>;
}

/// Repository trait for menu categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_categories(&self, restaurant_id: i64) -> CoreResult<Vec<Category>>;

    async fn category_owned_by(&self, owner_id: i64, id: i64) -> CoreResult<bool>;

    async fn create_category(&self, owner_id: i64, name: &str) -> CoreResult<i64>;

    /// Returns false when no category with this id belongs to `owner_id`.
    async fn rename_category(&self, owner_id: i64, id: i64, name: &str) -> CoreResult<bool>;

    async fn delete_category(&self, owner_id: i64, id: i64) -> CoreResult<bool>;
}

/// Repository trait for product catalog access
///
/// Mutations are scoped to the owning user and report whether a row matched.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(
        &self,
        restaurant_id: i64,
        filter: &ProductFilter,
    ) -> CoreResult<Vec<Product>>;

    async fn get_product(&self, restaurant_id: i64, id: i64) -> CoreResult<Option<Product>>;

    async fn create_product(&self, owner_id: i64, product: &NewProduct) -> CoreResult<i64>;

    async fn update_product(&self, owner_id: i64, id: i64, patch: &ProductPatch) -> CoreResult<bool>;

    async fn set_discount(&self, owner_id: i64, id: i64, discount_percent: i64) -> CoreResult<bool>;

    async fn update_happy_hour(
        &self,
        owner_id: i64,
        id: i64,
        patch: &HappyHourPatch,
    ) -> CoreResult<bool>;

    async fn delete_product(&self, owner_id: i64, id: i64) -> CoreResult<bool>;
}
