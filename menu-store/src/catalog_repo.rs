use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use menu_catalog::{Product, DEFAULT_HAPPY_HOUR_END, DEFAULT_HAPPY_HOUR_START};
use menu_core::repository::ProductRepository;
use menu_core::{CoreError, CoreResult, HappyHourPatch, NewProduct, ProductFilter, ProductPatch};

// Numeric columns keep whatever SQLite was handed, so anything that is not a
// number reads as NULL (or false) instead of failing the whole row
const PRODUCT_COLUMNS: &str = "id, user_id, \
    CASE WHEN typeof(category_id) = 'integer' THEN category_id END AS category_id, \
    name, description, \
    CASE WHEN typeof(price) IN ('integer', 'real') THEN CAST(price AS REAL) END AS price, \
    CASE WHEN typeof(is_featured) IN ('integer', 'real') THEN is_featured = 1 ELSE 0 END AS is_featured, \
    CASE WHEN typeof(discount_percent) IN ('integer', 'real') \
        THEN CAST(discount_percent AS INTEGER) END AS discount_percent, \
    CASE WHEN typeof(happy_hour_enabled) IN ('integer', 'real') \
        THEN happy_hour_enabled = 1 ELSE 0 END AS happy_hour_enabled, \
    CASE WHEN typeof(happy_hour_discount_percent) IN ('integer', 'real') \
        THEN CAST(happy_hour_discount_percent AS INTEGER) END AS happy_hour_discount_percent, \
    happy_hour_start, happy_hour_end, created_at";

pub struct StoreProductRepository {
    pool: SqlitePool,
}

impl StoreProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Defaulted columns can still hold NULL, so they load as options
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    user_id: i64,
    category_id: Option<i64>,
    name: String,
    description: Option<String>,
    price: Option<f64>,
    is_featured: Option<bool>,
    discount_percent: Option<i64>,
    happy_hour_enabled: Option<bool>,
    happy_hour_discount_percent: Option<i64>,
    happy_hour_start: Option<String>,
    happy_hour_end: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price: row.price.unwrap_or(0.0),
            is_featured: row.is_featured.unwrap_or(false),
            discount_percent: row.discount_percent.unwrap_or(0),
            happy_hour_enabled: row.happy_hour_enabled.unwrap_or(false),
            happy_hour_discount_percent: row.happy_hour_discount_percent.unwrap_or(0),
            happy_hour_start: row
                .happy_hour_start
                .unwrap_or_else(|| DEFAULT_HAPPY_HOUR_START.to_string()),
            happy_hour_end: row
                .happy_hour_end
                .unwrap_or_else(|| DEFAULT_HAPPY_HOUR_END.to_string()),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProductRepository for StoreProductRepository {
    async fn list_products(
        &self,
        restaurant_id: i64,
        filter: &ProductFilter,
    ) -> CoreResult<Vec<Product>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = "
        ));
        builder.push_bind(restaurant_id);

        if let Some(category_id) = filter.category_id {
            builder.push(" AND category_id = ");
            builder.push_bind(category_id);
        }
        if filter.featured {
            builder.push(" AND is_featured = 1");
        }
        if filter.discounted {
            builder.push(" AND typeof(discount_percent) IN ('integer', 'real') AND discount_percent > 0");
        }
        if filter.happy_hour {
            builder.push(" AND happy_hour_enabled = 1");
        }
        builder.push(" ORDER BY name");

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, restaurant_id: i64, id: i64) -> CoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(row.map(Product::from))
    }

    async fn create_product(&self, owner_id: i64, product: &NewProduct) -> CoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                user_id, category_id, name, description, price, is_featured, discount_percent,
                happy_hour_enabled, happy_hour_discount_percent, happy_hour_start, happy_hour_end
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner_id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.is_featured)
        .bind(product.discount_percent)
        .bind(product.happy_hour_enabled)
        .bind(product.happy_hour_discount_percent)
        .bind(&product.happy_hour_start)
        .bind(&product.happy_hour_end)
        .execute(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        let id = result.last_insert_rowid();
        tracing::debug!(product_id = id, owner_id, "Created product");
        Ok(id)
    }

    async fn update_product(&self, owner_id: i64, id: i64, patch: &ProductPatch) -> CoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                category_id = COALESCE(?, category_id),
                is_featured = COALESCE(?, is_featured),
                discount_percent = COALESCE(?, discount_percent),
                happy_hour_enabled = COALESCE(?, happy_hour_enabled),
                happy_hour_discount_percent = COALESCE(?, happy_hour_discount_percent),
                happy_hour_start = COALESCE(?, happy_hour_start),
                happy_hour_end = COALESCE(?, happy_hour_end)
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.price)
        .bind(patch.category_id)
        .bind(patch.is_featured)
        .bind(patch.discount_percent)
        .bind(patch.happy_hour_enabled)
        .bind(patch.happy_hour_discount_percent)
        .bind(&patch.happy_hour_start)
        .bind(&patch.happy_hour_end)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_discount(&self, owner_id: i64, id: i64, discount_percent: i64) -> CoreResult<bool> {
        let result = sqlx::query("UPDATE products SET discount_percent = ? WHERE id = ? AND user_id = ?")
            .bind(discount_percent)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_happy_hour(
        &self,
        owner_id: i64,
        id: i64,
        patch: &HappyHourPatch,
    ) -> CoreResult<bool> {
        if patch.is_empty() {
            return Err(CoreError::ValidationError("no updates".to_string()));
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE products SET ");
        let mut fields = builder.separated(", ");
        if let Some(enabled) = patch.enabled {
            fields.push("happy_hour_enabled = ");
            fields.push_bind_unseparated(enabled);
        }
        if let Some(discount_percent) = patch.discount_percent {
            fields.push("happy_hour_discount_percent = ");
            fields.push_bind_unseparated(discount_percent);
        }
        if let Some(start) = &patch.start {
            fields.push("happy_hour_start = ");
            fields.push_bind_unseparated(start.clone());
        }
        if let Some(end) = &patch.end {
            fields.push("happy_hour_end = ");
            fields.push_bind_unseparated(end.clone());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" AND user_id = ");
        builder.push_bind(owner_id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, owner_id: i64, id: i64) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }
}
