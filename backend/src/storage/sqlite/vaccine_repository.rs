use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::vaccine::{NewVaccineDefinition, VaccineDefinition};
use crate::storage::traits::VaccineCatalog;

/// SQLite-backed master vaccine catalog
#[derive(Clone)]
pub struct SqliteVaccineRepository {
    db: DbConnection,
}

impl SqliteVaccineRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_definition(row: &SqliteRow) -> VaccineDefinition {
        VaccineDefinition {
            id: row.get("id"),
            name: row.get("name"),
            age_in_weeks: row.get("age_in_weeks"),
            is_default: row.get("is_default"),
        }
    }
}

#[async_trait]
impl VaccineCatalog for SqliteVaccineRepository {
    async fn insert_definition(
        &self,
        definition: NewVaccineDefinition,
    ) -> Result<VaccineDefinition> {
        let result =
            sqlx::query("INSERT INTO vaccines (name, age_in_weeks, is_default) VALUES (?, ?, ?)")
                .bind(&definition.name)
                .bind(definition.age_in_weeks)
                .bind(definition.is_default)
                .execute(self.db.pool())
                .await?;

        Ok(VaccineDefinition {
            id: result.last_insert_rowid(),
            name: definition.name,
            age_in_weeks: definition.age_in_weeks,
            is_default: definition.is_default,
        })
    }

    async fn list_all(&self) -> Result<Vec<VaccineDefinition>> {
        let rows = sqlx::query("SELECT * FROM vaccines ORDER BY age_in_weeks, name")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(Self::row_to_definition).collect())
    }

    async fn list_defaults(&self) -> Result<Vec<VaccineDefinition>> {
        let rows =
            sqlx::query("SELECT * FROM vaccines WHERE is_default = 1 ORDER BY age_in_weeks, name")
                .fetch_all(self.db.pool())
                .await?;

        Ok(rows.iter().map(Self::row_to_definition).collect())
    }

    async fn delete_definition(&self, definition_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vaccines WHERE id = ?")
            .bind(definition_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_defaults(&self, definitions: &[NewVaccineDefinition]) -> Result<u64> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM vaccines WHERE is_default = 1")
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0u64;
        for definition in definitions {
            sqlx::query("INSERT INTO vaccines (name, age_in_weeks, is_default) VALUES (?, ?, 1)")
                .bind(&definition.name)
                .bind(definition.age_in_weeks)
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
