pub mod models;
pub mod repository;

pub use models::{AccountPatch, HappyHourPatch, NewProduct, ProductFilter, ProductPatch, UserCredentials};
pub use repository::{CategoryRepository, ProductRepository, RestaurantRepository};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Conflict: {0}")]
    ConflictError(String),
    #[error("Storage error: {0}")]
    StorageError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageError(Box::new(err))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
