pub mod product;
pub mod restaurant;
pub mod pricing;

pub use product::{Product, DEFAULT_HAPPY_HOUR_START, DEFAULT_HAPPY_HOUR_END};
pub use restaurant::{Account, Category, Restaurant};
pub use pricing::{EffectiveDiscount, PricedProduct, PricingEngine, PricingError};
