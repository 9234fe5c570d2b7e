use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HAPPY_HOUR_START: &str = "18:00";
pub const DEFAULT_HAPPY_HOUR_END: &str = "20:00";

/// A menu item owned by a restaurant.
///
/// Only the stored fields live here. The effective discount and final price
/// depend on the time of the read and are computed by [`crate::pricing`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_featured: bool,
    pub discount_percent: i64,
    pub happy_hour_enabled: bool,
    pub happy_hour_discount_percent: i64,
    /// "HH:MM", server wall clock
    pub happy_hour_start: String,
    pub happy_hour_end: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Product {
    /// Happy-hour bounds, falling back to the defaults for empty values.
    pub fn happy_hour_window(&self) -> (&str, &str) {
        let start = if self.happy_hour_start.is_empty() {
            DEFAULT_HAPPY_HOUR_START
        } else {
            &self.happy_hour_start
        };
        let end = if self.happy_hour_end.is_empty() {
            DEFAULT_HAPPY_HOUR_END
        } else {
            &self.happy_hour_end
        };
        (start, end)
    }
}

#[cfg(test)]
pub(crate) fn sample_product() -> Product {
    Product {
        id: 1,
        user_id: 1,
        category_id: None,
        name: "Margherita".to_string(),
        description: None,
        price: 100.0,
        is_featured: false,
        discount_percent: 10,
        happy_hour_enabled: true,
        happy_hour_discount_percent: 50,
        happy_hour_start: "18:00".to_string(),
        happy_hour_end: "20:00".to_string(),
        created_at: None,
    }
}
