use async_trait::async_trait;
use sqlx::SqlitePool;
use menu_catalog::Category;
use menu_core::repository::CategoryRepository;
use menu_core::{CoreError, CoreResult};

pub struct StoreCategoryRepository {
    pool: SqlitePool,
}

impl StoreCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

#[async_trait]
impl CategoryRepository for StoreCategoryRepository {
    async fn list_categories(&self, restaurant_id: i64) -> CoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name FROM categories WHERE user_id = ? ORDER BY name",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(rows
            .into_iter()
            .map(|row| Category { id: row.id, name: row.name })
            .collect())
    }

    async fn category_owned_by(&self, owner_id: i64, id: i64) -> CoreResult<bool> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT id FROM categories WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(row.is_some())
    }

    async fn create_category(&self, owner_id: i64, name: &str) -> CoreResult<i64> {
        let result = sqlx::query("INSERT INTO categories (user_id, name) VALUES (?, ?)")
            .bind(owner_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.last_insert_rowid())
    }

    async fn rename_category(&self, owner_id: i64, id: i64, name: &str) -> CoreResult<bool> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ? AND user_id = ?")
            .bind(name)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_category(&self, owner_id: i64, id: i64) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DbClient, StoreRestaurantRepository};
    use menu_core::repository::RestaurantRepository;

    #[tokio::test]
    async fn test_category_scoped_to_owner() {
        let db = DbClient::in_memory().await.unwrap();
        let users = StoreRestaurantRepository::new(db.pool.clone());
        let repo = StoreCategoryRepository::new(db.pool.clone());

        let owner = users.create_user("a@test", "h", "A").await.unwrap();
        let stranger = users.create_user("b@test", "h", "B").await.unwrap();

        let drinks = repo.create_category(owner, "Drinks").await.unwrap();
        repo.create_category(owner, "Desserts").await.unwrap();

        assert!(repo.category_owned_by(owner, drinks).await.unwrap());
        assert!(!repo.category_owned_by(stranger, drinks).await.unwrap());
        assert!(!repo.rename_category(stranger, drinks, "Mine now").await.unwrap());
        assert!(!repo.delete_category(stranger, drinks).await.unwrap());

        assert!(repo.rename_category(owner, drinks, "Beverages").await.unwrap());
        let names: Vec<String> = repo
            .list_categories(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Beverages", "Desserts"]);

        assert!(repo.delete_category(owner, drinks).await.unwrap());
        assert_eq!(repo.list_categories(owner).await.unwrap().len(), 1);
    }
}
