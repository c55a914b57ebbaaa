use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

/// DbConnection manages the SQLite pool and schema for the backend
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database file and
    /// schema if they do not exist yet
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a uniquely named in-memory database.
    ///
    /// Used by tests; the database lives as long as this pool does.
    pub async fn init_in_memory() -> Result<Self> {
        let db_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", db_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vaccines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age_in_weeks INTEGER NOT NULL,
                is_default INTEGER NOT NULL DEFAULT 1
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS child_vaccine_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_user_id INTEGER NOT NULL REFERENCES users(id),
                baby_name TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                vaccine_id INTEGER NOT NULL REFERENCES vaccines(id),
                scheduled_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Pending'
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_owner_baby
                ON child_vaccine_records (owner_user_id, baby_name);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_in_memory()
            .await
            .expect("Failed to create test database");

        let tables: Vec<String> =
            sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .expect("Failed to list tables")
                .iter()
                .map(|row| row.get("name"))
                .collect();

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"vaccines".to_string()));
        assert!(tables.contains(&"child_vaccine_records".to_string()));
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let db1 = DbConnection::init_in_memory().await.unwrap();
        let db2 = DbConnection::init_in_memory().await.unwrap();

        sqlx::query("INSERT INTO vaccines (name, age_in_weeks, is_default) VALUES (?, ?, ?)")
            .bind("BCG")
            .bind(0i64)
            .bind(1i64)
            .execute(db1.pool())
            .await
            .unwrap();

        let count1: i64 = sqlx::query("SELECT COUNT(*) AS n FROM vaccines")
            .fetch_one(db1.pool())
            .await
            .unwrap()
            .get("n");
        let count2: i64 = sqlx::query("SELECT COUNT(*) AS n FROM vaccines")
            .fetch_one(db2.pool())
            .await
            .unwrap()
            .get("n");

        assert_eq!(count1, 1);
        assert_eq!(count2, 0);
    }
}
