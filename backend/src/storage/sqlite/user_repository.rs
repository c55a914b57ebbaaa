use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::user::{NewUser, Role, User};
use crate::storage::traits::UserStore;

/// SQLite-backed user account repository
#[derive(Clone)]
pub struct SqliteUserRepository {
    db: DbConnection,
}

impl SqliteUserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let role: String = row.get("role");
        let role = Role::parse(&role)
            .ok_or_else(|| anyhow::anyhow!("unknown role in users table: {}", role))?;

        Ok(User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            password_hash: row.get("password_hash"),
            role,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl UserStore for SqliteUserRepository {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, phone, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn setup_test() -> SqliteUserRepository {
        let db = DbConnection::init_in_memory()
            .await
            .expect("Failed to create test database");
        SqliteUserRepository::new(db)
    }

    fn new_user(email: &str) -> NewUser {
        let now = Utc::now();
        NewUser {
            name: "Priya".to_string(),
            email: email.to_string(),
            phone: None,
            password_hash: "$argon2id$fake".to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let repo = setup_test().await;

        let created = repo.insert_user(new_user("priya@example.com")).await.unwrap();
        assert!(created.id > 0);

        let found = repo
            .find_by_email("priya@example.com")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::User);
        assert_eq!(found.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_schema() {
        let repo = setup_test().await;

        repo.insert_user(new_user("dup@example.com")).await.unwrap();
        let result = repo.insert_user(new_user("dup@example.com")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let repo = setup_test().await;
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }
}
