use chrono::{FixedOffset, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::product::Product;

const SECONDS_PER_MINUTE: i32 = 60;

/// Outcome of resolving happy-hour precedence for one product at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveDiscount {
    pub active: bool,
    pub discount_percent: i64,
}

/// A product as handed to clients: the stored fields plus the pricing
/// derived at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub is_happy_hour_active: bool,
    pub effective_discount_percent: i64,
    pub final_price: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("UTC offset out of range: {0} minutes")]
    InvalidUtcOffset(i32),
}

/// Parse "HH:MM" into minutes since midnight.
///
/// Anything after the second `:` is ignored. A blank component reads as 0
/// and a sign is accepted, so `"18:"` is 1080 and `"-1:00"` is -60. Returns
/// `None` when the `:` is missing or a component is not an integer.
pub fn parse_time_to_minutes(value: &str) -> Option<i64> {
    let mut parts = value.split(':');
    let hours = parse_component(parts.next()?)?;
    let minutes = parse_component(parts.next()?)?;
    hours.checked_mul(60)?.checked_add(minutes)
}

fn parse_component(part: &str) -> Option<i64> {
    let part = part.trim();
    if part.is_empty() {
        return Some(0);
    }
    part.parse().ok()
}

/// Whether `now_minutes` falls inside the daily window `[start, end]`.
///
/// Equal bounds mean the window covers the whole day; `start > end` wraps
/// past midnight. Unparseable bounds make the window inactive.
pub fn is_window_active(now_minutes: u32, start: &str, end: &str) -> bool {
    let (Some(start), Some(end)) = (parse_time_to_minutes(start), parse_time_to_minutes(end)) else {
        return false;
    };
    let now = i64::from(now_minutes);

    if start == end {
        return true;
    }
    if start < end {
        return now >= start && now <= end;
    }

    now >= start || now <= end
}

/// Happy-hour discount when enabled and in its window, base discount otherwise.
pub fn effective_discount(product: &Product, now_minutes: u32) -> EffectiveDiscount {
    let (start, end) = product.happy_hour_window();
    let active = product.happy_hour_enabled && is_window_active(now_minutes, start, end);

    if active {
        return EffectiveDiscount {
            active,
            discount_percent: product.happy_hour_discount_percent,
        };
    }

    EffectiveDiscount {
        active,
        discount_percent: product.discount_percent,
    }
}

/// Attach `is_happy_hour_active`, `effective_discount_percent` and
/// `final_price` to a product. The percent is clamped to 0..=100.
pub fn price_product(product: Product, now_minutes: u32) -> PricedProduct {
    let pricing = effective_discount(&product, now_minutes);
    let discount = pricing.discount_percent.clamp(0, 100);
    let final_price = round_to_cents(product.price * (1.0 - discount as f64 / 100.0));

    PricedProduct {
        product,
        is_happy_hour_active: pricing.active,
        effective_discount_percent: discount,
        final_price,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn minutes_since_midnight<T: Timelike>(time: &T) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Decides which wall clock "now" is read from and prices products against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine {
    /// `None` reads the server's local time.
    utc_offset: Option<FixedOffset>,
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the clock to a fixed offset from UTC, e.g. the restaurant's zone.
    pub fn with_utc_offset(offset_minutes: Option<i32>) -> Result<Self, PricingError> {
        let utc_offset = match offset_minutes {
            Some(minutes) => Some(
                minutes
                    .checked_mul(SECONDS_PER_MINUTE)
                    .and_then(FixedOffset::east_opt)
                    .ok_or(PricingError::InvalidUtcOffset(minutes))?,
            ),
            None => None,
        };

        Ok(Self { utc_offset })
    }

    pub fn now_minutes(&self) -> u32 {
        match self.utc_offset {
            Some(offset) => minutes_since_midnight(&Utc::now().with_timezone(&offset)),
            None => minutes_since_midnight(&Local::now()),
        }
    }

    pub fn price(&self, product: Product) -> PricedProduct {
        price_product(product, self.now_minutes())
    }

    /// Price a listing. The clock is read once so every row agrees on "now".
    pub fn price_all(&self, products: Vec<Product>) -> Vec<PricedProduct> {
        let now = self.now_minutes();
        tracing::trace!(now_minutes = now, count = products.len(), "Pricing product listing");
        products
            .into_iter()
            .map(|product| price_product(product, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::sample_product;
    use chrono::NaiveTime;

    #[test]
    fn test_parse_time_to_minutes() {
        assert_eq!(parse_time_to_minutes("18:00"), Some(1080));
        assert_eq!(parse_time_to_minutes("00:00"), Some(0));
        assert_eq!(parse_time_to_minutes("23:59"), Some(1439));
        assert_eq!(parse_time_to_minutes("7:5"), Some(425));
        assert_eq!(parse_time_to_minutes("12:30:45"), Some(750));
        assert_eq!(parse_time_to_minutes("abc"), None);
        assert_eq!(parse_time_to_minutes("18"), None);
        assert_eq!(parse_time_to_minutes("18:xx"), None);
        assert_eq!(parse_time_to_minutes(""), None);
        assert_eq!(parse_time_to_minutes("18:"), Some(1080));
        assert_eq!(parse_time_to_minutes(" :30"), Some(30));
        assert_eq!(parse_time_to_minutes("-1:00"), Some(-60));
        assert_eq!(parse_time_to_minutes("+2:15"), Some(135));
        assert_eq!(parse_time_to_minutes("7.5:00"), None);
    }

    #[test]
    fn test_blank_minutes_still_open_the_window() {
        assert!(is_window_active(1100, "18:", "20:00"));
        assert!(!is_window_active(1000, "18:", "20:00"));
        // Window from -60 to 30 minutes covers just after midnight
        assert!(is_window_active(10, "-1:00", "00:30"));
    }

    #[test]
    fn test_regular_window_is_inclusive() {
        for now in 0..1440 {
            let expected = (1080..=1200).contains(&now);
            assert_eq!(is_window_active(now, "18:00", "20:00"), expected, "now = {}", now);
        }
    }

    #[test]
    fn test_window_wraps_past_midnight() {
        for now in 0..1440 {
            let expected = now >= 1320 || now <= 120;
            assert_eq!(is_window_active(now, "22:00", "02:00"), expected, "now = {}", now);
        }
    }

    #[test]
    fn test_equal_bounds_cover_whole_day() {
        assert!((0..1440).all(|now| is_window_active(now, "09:00", "09:00")));
    }

    #[test]
    fn test_malformed_bounds_fail_closed() {
        assert!((0..1440).all(|now| !is_window_active(now, "abc", "20:00")));
        assert!(!is_window_active(1140, "18:00", "20"));
        assert!(!is_window_active(1140, "abc", "abc"));
    }

    #[test]
    fn test_disabled_happy_hour_uses_base_discount() {
        let mut product = sample_product();
        product.happy_hour_enabled = false;

        let pricing = effective_discount(&product, 1140);
        assert_eq!(pricing, EffectiveDiscount { active: false, discount_percent: 10 });
    }

    #[test]
    fn test_happy_hour_price_inside_window() {
        let priced = price_product(sample_product(), 1140);

        assert!(priced.is_happy_hour_active);
        assert_eq!(priced.effective_discount_percent, 50);
        assert_eq!(priced.final_price, 50.0);
    }

    #[test]
    fn test_base_price_outside_window() {
        let priced = price_product(sample_product(), 600);

        assert!(!priced.is_happy_hour_active);
        assert_eq!(priced.effective_discount_percent, 10);
        assert_eq!(priced.final_price, 90.0);
    }

    #[test]
    fn test_discount_is_clamped() {
        let mut product = sample_product();
        product.happy_hour_enabled = false;
        product.discount_percent = 150;

        let priced = price_product(product.clone(), 600);
        assert_eq!(priced.effective_discount_percent, 100);
        assert_eq!(priced.final_price, 0.0);

        product.discount_percent = -20;
        let priced = price_product(product, 600);
        assert_eq!(priced.effective_discount_percent, 0);
        assert_eq!(priced.final_price, 100.0);
    }

    #[test]
    fn test_final_price_rounds_to_cents() {
        let mut product = sample_product();
        product.happy_hour_enabled = false;
        product.price = 9.99;
        product.discount_percent = 15;

        // 9.99 * 0.85 = 8.4915
        assert_eq!(price_product(product, 0).final_price, 8.49);
    }

    #[test]
    fn test_priced_product_keeps_product_fields() {
        let json = serde_json::to_value(price_product(sample_product(), 1140)).unwrap();

        assert_eq!(json["name"], "Margherita");
        assert_eq!(json["discount_percent"], 10);
        assert_eq!(json["price"], 100.0);
        assert_eq!(json["is_happy_hour_active"], true);
        assert_eq!(json["effective_discount_percent"], 50);
        assert_eq!(json["final_price"], 50.0);
    }

    #[test]
    fn test_minutes_since_midnight() {
        let time = NaiveTime::from_hms_opt(19, 0, 59).unwrap();
        assert_eq!(minutes_since_midnight(&time), 1140);
    }

    #[test]
    fn test_utc_offset_validation() {
        assert!(PricingEngine::with_utc_offset(Some(120)).is_ok());
        assert!(PricingEngine::with_utc_offset(None).is_ok());
        assert!(matches!(
            PricingEngine::with_utc_offset(Some(24 * 60)),
            Err(PricingError::InvalidUtcOffset(1440))
        ));
    }

    #[test]
    fn test_engine_prices_within_day() {
        let engine = PricingEngine::with_utc_offset(Some(0)).unwrap();
        assert!(engine.now_minutes() < 1440);

        let priced = engine.price_all(vec![sample_product(), sample_product()]);
        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].is_happy_hour_active, priced[1].is_happy_hour_active);
    }
}
