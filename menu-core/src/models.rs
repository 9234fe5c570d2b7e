use menu_catalog::{DEFAULT_HAPPY_HOUR_END, DEFAULT_HAPPY_HOUR_START};
use menu_shared::Masked;

/// Login lookup result. The hash never leaves the API layer.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub password_hash: Masked<String>,
    pub restaurant_name: String,
}

/// Partial profile update; `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub restaurant_name: Option<String>,
    pub password_hash: Option<Masked<String>>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.restaurant_name.is_none() && self.password_hash.is_none()
    }
}

/// Listing filters for the public menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub featured: bool,
    /// Only products whose base discount is above zero.
    pub discounted: bool,
    /// Only products with happy hour switched on (active or not).
    pub happy_hour: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_featured: bool,
    pub discount_percent: i64,
    pub happy_hour_enabled: bool,
    pub happy_hour_discount_percent: i64,
    pub happy_hour_start: String,
    pub happy_hour_end: String,
}

impl NewProduct {
    /// A product with only the required fields set and every other column at
    /// its default.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            category_id: None,
            name: name.into(),
            description: None,
            price,
            is_featured: false,
            discount_percent: 0,
            happy_hour_enabled: false,
            happy_hour_discount_percent: 0,
            happy_hour_start: DEFAULT_HAPPY_HOUR_START.to_string(),
            happy_hour_end: DEFAULT_HAPPY_HOUR_END.to_string(),
        }
    }
}

/// Partial product update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HappyHourPatch {
    pub enabled: Option<bool>,
    pub discount_percent: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl HappyHourPatch {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.discount_percent.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_defaults() {
        let product = NewProduct::new("Espresso", 2.5);
        assert_eq!(product.happy_hour_start, "18:00");
        assert_eq!(product.happy_hour_end, "20:00");
        assert_eq!(product.discount_percent, 0);
        assert!(!product.happy_hour_enabled);
    }

    #[test]
    fn test_empty_patches() {
        assert!(AccountPatch::default().is_empty());
        assert!(HappyHourPatch::default().is_empty());
        assert!(!HappyHourPatch { enabled: Some(false), ..Default::default() }.is_empty());
    }
}
