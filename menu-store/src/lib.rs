pub mod app_config;
pub mod database;
pub mod restaurant_repo;
pub mod category_repo;
pub mod catalog_repo;

pub use database::DbClient;
pub use restaurant_repo::StoreRestaurantRepository;
pub use category_repo::StoreCategoryRepository;
pub use catalog_repo::StoreProductRepository;
