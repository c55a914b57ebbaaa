use anyhow::Result;
use async_trait::async_trait;
use shared::VaccineStatus;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::db::DbConnection;
use crate::domain::models::vaccine::{
    ChildScheduleEntry, ChildVaccineRecord, NewChildVaccineRecord, VaccineDefinition,
};
use crate::storage::traits::ChildVaccineRecordStore;

/// SQLite-backed store for per-child scheduled doses
#[derive(Clone)]
pub struct SqliteChildVaccineRecordRepository {
    db: DbConnection,
}

impl SqliteChildVaccineRecordRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_record(row: &SqliteRow) -> Result<ChildVaccineRecord> {
        let status: String = row.get("status");
        let status = VaccineStatus::parse(&status)
            .ok_or_else(|| anyhow::anyhow!("unknown status in child_vaccine_records: {}", status))?;

        Ok(ChildVaccineRecord {
            id: row.get("id"),
            owner_user_id: row.get("owner_user_id"),
            baby_name: row.get("baby_name"),
            date_of_birth: row.get("date_of_birth"),
            vaccine_id: row.get("vaccine_id"),
            scheduled_date: row.get("scheduled_date"),
            status,
        })
    }

    /// Build the multi-row INSERT for a batch of drafts.
    /// Caller must ensure `records` is non-empty.
    fn bulk_insert_query(records: &[NewChildVaccineRecord]) -> QueryBuilder<'_, Sqlite> {
        let mut builder = QueryBuilder::new(
            "INSERT INTO child_vaccine_records \
             (owner_user_id, baby_name, date_of_birth, vaccine_id, scheduled_date, status) ",
        );
        builder.push_values(records, |mut row, record| {
            row.push_bind(record.owner_user_id)
                .push_bind(&record.baby_name)
                .push_bind(record.date_of_birth)
                .push_bind(record.vaccine_id)
                .push_bind(record.scheduled_date)
                .push_bind(record.status.as_str());
        });
        builder
    }
}

#[async_trait]
impl ChildVaccineRecordStore for SqliteChildVaccineRecordRepository {
    async fn insert_many(&self, records: &[NewChildVaccineRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let result = Self::bulk_insert_query(records)
            .build()
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }

    async fn replace_for_child(
        &self,
        owner_user_id: i64,
        baby_name: &str,
        records: &[NewChildVaccineRecord],
    ) -> Result<u64> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM child_vaccine_records WHERE owner_user_id = ? AND baby_name = ?")
            .bind(owner_user_id)
            .bind(baby_name)
            .execute(&mut *tx)
            .await?;

        let inserted = if records.is_empty() {
            0
        } else {
            Self::bulk_insert_query(records)
                .build()
                .execute(&mut *tx)
                .await?
                .rows_affected()
        };

        tx.commit().await?;
        Ok(inserted)
    }

    async fn exists_for_child(&self, owner_user_id: i64, baby_name: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM child_vaccine_records WHERE owner_user_id = ? AND baby_name = ? LIMIT 1",
        )
        .bind(owner_user_id)
        .bind(baby_name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.is_some())
    }

    async fn list_child_names(&self, owner_user_id: i64) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT baby_name FROM child_vaccine_records \
             WHERE owner_user_id = ? ORDER BY baby_name",
        )
        .bind(owner_user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|row| row.get("baby_name")).collect())
    }

    async fn list_for_child(
        &self,
        owner_user_id: i64,
        baby_name: &str,
    ) -> Result<Vec<ChildScheduleEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.owner_user_id, r.baby_name, r.date_of_birth, r.vaccine_id,
                   r.scheduled_date, r.status,
                   v.name AS vaccine_name, v.age_in_weeks, v.is_default
            FROM child_vaccine_records r
            JOIN vaccines v ON v.id = r.vaccine_id
            WHERE r.owner_user_id = ? AND r.baby_name = ?
            ORDER BY r.scheduled_date ASC, r.id ASC
            "#,
        )
        .bind(owner_user_id)
        .bind(baby_name)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let record = Self::row_to_record(row)?;
                let vaccine = VaccineDefinition {
                    id: record.vaccine_id,
                    name: row.get("vaccine_name"),
                    age_in_weeks: row.get("age_in_weeks"),
                    is_default: row.get("is_default"),
                };
                Ok(ChildScheduleEntry { record, vaccine })
            })
            .collect()
    }

    async fn mark_done(
        &self,
        owner_user_id: i64,
        record_id: i64,
    ) -> Result<Option<ChildVaccineRecord>> {
        let result = sqlx::query(
            "UPDATE child_vaccine_records SET status = 'Done' \
             WHERE id = ? AND owner_user_id = ?",
        )
        .bind(record_id)
        .bind(owner_user_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query("SELECT * FROM child_vaccine_records WHERE id = ?")
            .bind(record_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(Some(Self::row_to_record(&row)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::SqliteVaccineRepository;
    use crate::storage::traits::VaccineCatalog;
    use chrono::NaiveDate;

    async fn setup_test() -> (SqliteChildVaccineRecordRepository, Vec<i64>) {
        let db = DbConnection::init_in_memory()
            .await
            .expect("Failed to create test database");

        let catalog = SqliteVaccineRepository::new(db.clone());
        let mut vaccine_ids = Vec::new();
        for (name, weeks) in [("BCG", 0u32), ("OPV-1", 6)] {
            let def = catalog
                .insert_definition(crate::domain::models::vaccine::NewVaccineDefinition {
                    name: name.to_string(),
                    age_in_weeks: weeks,
                    is_default: true,
                })
                .await
                .unwrap();
            vaccine_ids.push(def.id);
        }

        (SqliteChildVaccineRecordRepository::new(db), vaccine_ids)
    }

    fn draft(owner: i64, baby: &str, vaccine_id: i64, day: u32) -> NewChildVaccineRecord {
        NewChildVaccineRecord {
            owner_user_id: owner,
            baby_name: baby.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            vaccine_id,
            scheduled_date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            status: VaccineStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_insert_many_counts_rows() {
        let (repo, ids) = setup_test().await;

        let drafts = vec![draft(1, "Ada", ids[0], 1), draft(1, "Ada", ids[1], 12)];
        assert_eq!(repo.insert_many(&drafts).await.unwrap(), 2);
        assert_eq!(repo.insert_many(&[]).await.unwrap(), 0);
        assert!(repo.exists_for_child(1, "Ada").await.unwrap());
        assert!(!repo.exists_for_child(1, "Ben").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_for_child_is_sorted_and_joined() {
        let (repo, ids) = setup_test().await;

        // Insert out of date order
        let drafts = vec![draft(1, "Ada", ids[1], 12), draft(1, "Ada", ids[0], 1)];
        repo.insert_many(&drafts).await.unwrap();

        let entries = repo.list_for_child(1, "Ada").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].record.scheduled_date <= entries[1].record.scheduled_date);
        assert_eq!(entries[0].vaccine.name, "BCG");
        assert_eq!(entries[1].vaccine.name, "OPV-1");
    }

    #[tokio::test]
    async fn test_replace_for_child_only_touches_that_child() {
        let (repo, ids) = setup_test().await;

        repo.insert_many(&[draft(1, "Ada", ids[0], 1), draft(1, "Ben", ids[0], 1)])
            .await
            .unwrap();

        let replacement = vec![draft(1, "Ada", ids[1], 12)];
        assert_eq!(repo.replace_for_child(1, "Ada", &replacement).await.unwrap(), 1);

        assert_eq!(repo.list_for_child(1, "Ada").await.unwrap().len(), 1);
        assert_eq!(repo.list_for_child(1, "Ben").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_done_is_owner_scoped() {
        let (repo, ids) = setup_test().await;

        repo.insert_many(&[draft(1, "Ada", ids[0], 1)]).await.unwrap();
        let record_id = repo.list_for_child(1, "Ada").await.unwrap()[0].record.id;

        // Wrong owner: untouched
        assert!(repo.mark_done(2, record_id).await.unwrap().is_none());

        let updated = repo.mark_done(1, record_id).await.unwrap().unwrap();
        assert_eq!(updated.status, VaccineStatus::Done);
    }
}
