use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use menu_catalog::{Account, Restaurant};
use menu_core::repository::RestaurantRepository;
use menu_core::{AccountPatch, CoreError, CoreResult, UserCredentials};
use menu_shared::Masked;

pub struct StoreRestaurantRepository {
    pool: SqlitePool,
}

impl StoreRestaurantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: i64,
    password_hash: String,
    restaurant_name: String,
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    restaurant_name: String,
}

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    restaurant_name: String,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: row.id,
            restaurant_name: row.restaurant_name,
        }
    }
}

/// A lost race on the unique email index surfaces as a conflict.
fn email_conflict(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CoreError::ConflictError("email in use".to_string())
        }
        _ => CoreError::storage(err),
    }
}

#[async_trait]
impl RestaurantRepository for StoreRestaurantRepository {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        restaurant_name: &str,
    ) -> CoreResult<i64> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, restaurant_name) VALUES (?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(restaurant_name)
        .execute(&self.pool)
        .await
        .map_err(email_conflict)?;

        let id = result.last_insert_rowid();
        tracing::info!(user_id = id, "Registered restaurant");
        Ok(id)
    }

    async fn find_credentials(&self, email: &str) -> CoreResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, password_hash, restaurant_name FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(row.map(|row| UserCredentials {
            id: row.id,
            password_hash: Masked(row.password_hash),
            restaurant_name: row.restaurant_name,
        }))
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> CoreResult<bool> {
        let row: Option<(i64,)> = match except_id {
            Some(id) => {
                sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE email = ? AND id != ?")
                    .bind(email)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE email = ?")
                    .bind(email)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(CoreError::storage)?;

        Ok(row.is_some())
    }

    async fn get_account(&self, id: i64) -> CoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, restaurant_name FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(row.map(|row| Account {
            id: row.id,
            email: row.email,
            restaurant_name: row.restaurant_name,
        }))
    }

    async fn update_account(&self, id: i64, patch: &AccountPatch) -> CoreResult<bool> {
        if patch.is_empty() {
            return Err(CoreError::ValidationError("no updates".to_string()));
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut fields = builder.separated(", ");
        if let Some(email) = &patch.email {
            fields.push("email = ");
            fields.push_bind_unseparated(email.clone());
        }
        if let Some(restaurant_name) = &patch.restaurant_name {
            fields.push("restaurant_name = ");
            fields.push_bind_unseparated(restaurant_name.clone());
        }
        if let Some(password_hash) = &patch.password_hash {
            fields.push("password_hash = ");
            fields.push_bind_unseparated(password_hash.expose().clone());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(email_conflict)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_account(&self, id: i64) -> CoreResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        tracing::info!(user_id = id, "Deleted restaurant account");
        Ok(())
    }

    async fn list_restaurants(&self) -> CoreResult<Vec<Restaurant>> {
        let rows = sqlx::query_as::<_, RestaurantRow>(
            "SELECT id, restaurant_name FROM users ORDER BY restaurant_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn get_restaurant(&self, id: i64) -> CoreResult<Option<Restaurant>> {
        let row = sqlx::query_as::<_, RestaurantRow>(
            "SELECT id, restaurant_name FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(row.map(Restaurant::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbClient;

    async fn repo() -> StoreRestaurantRepository {
        let db = DbClient::in_memory().await.unwrap();
        StoreRestaurantRepository::new(db.pool)
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let repo = repo().await;
        let id = repo.create_user("owner@bistro.test", "hash", "Bistro").await.unwrap();

        let creds = repo.find_credentials("owner@bistro.test").await.unwrap().unwrap();
        assert_eq!(creds.id, id);
        assert_eq!(creds.password_hash.expose(), "hash");
        assert!(repo.find_credentials("nobody@bistro.test").await.unwrap().is_none());

        assert!(repo.email_taken("owner@bistro.test", None).await.unwrap());
        assert!(!repo.email_taken("owner@bistro.test", Some(id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let repo = repo().await;
        repo.create_user("taken@test", "h", "First").await.unwrap();
        let other = repo.create_user("free@test", "h", "Second").await.unwrap();

        let err = repo.create_user("taken@test", "h", "Copycat").await;
        assert!(matches!(err, Err(CoreError::ConflictError(_))));

        let patch = AccountPatch {
            email: Some("taken@test".to_string()),
            ..Default::default()
        };
        let err = repo.update_account(other, &patch).await;
        assert!(matches!(err, Err(CoreError::ConflictError(_))));
    }

    #[tokio::test]
    async fn test_restaurants_sorted_by_name() {
        let repo = repo().await;
        repo.create_user("z@test", "h", "Zucchini").await.unwrap();
        repo.create_user("a@test", "h", "Anchovy").await.unwrap();

        let names: Vec<String> = repo
            .list_restaurants()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.restaurant_name)
            .collect();
        assert_eq!(names, vec!["Anchovy", "Zucchini"]);
    }

    #[tokio::test]
    async fn test_partial_account_update() {
        let repo = repo().await;
        let id = repo.create_user("old@test", "h", "Old Name").await.unwrap();

        let patch = AccountPatch {
            restaurant_name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(repo.update_account(id, &patch).await.unwrap());
        assert!(!repo.update_account(id + 100, &patch).await.unwrap());

        let account = repo.get_account(id).await.unwrap().unwrap();
        assert_eq!(account.email, "old@test");
        assert_eq!(account.restaurant_name, "New Name");

        let err = repo.update_account(id, &AccountPatch::default()).await;
        assert!(matches!(err, Err(CoreError::ValidationError(_))));
    }
}
