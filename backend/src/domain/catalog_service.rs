use log::info;
use std::sync::Arc;

use crate::domain::commands::vaccine::AddVaccineCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::vaccine::{NewVaccineDefinition, VaccineDefinition};
use crate::storage::traits::VaccineCatalog;

/// The built-in infant schedule installed by the seed process, as
/// (name, due age in weeks) pairs.
pub const DEFAULT_SCHEDULE: &[(&str, u32)] = &[
    ("BCG", 0),
    ("Hepatitis B (Birth Dose)", 0),
    ("OPV-0", 0),
    ("OPV-1", 6),
    ("Pentavalent-1", 6),
    ("Rotavirus-1", 6),
    ("PCV-1", 6),
    ("OPV-2", 10),
    ("Pentavalent-2", 10),
    ("Rotavirus-2", 10),
    ("OPV-3", 14),
    ("Pentavalent-3", 14),
    ("Rotavirus-3", 14),
    ("PCV-2", 14),
    ("Measles-Rubella 1", 36),
    ("Vitamin A (First Dose)", 36),
    ("PCV Booster", 36),
];

/// Service for administering the master vaccine catalog
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn VaccineCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn VaccineCatalog>) -> Self {
        Self { catalog }
    }

    /// Every definition in the catalog, defaults and extras alike
    pub async fn list_catalog(&self) -> Result<Vec<VaccineDefinition>, DomainError> {
        Ok(self.catalog.list_all().await?)
    }

    /// Add a definition to the catalog
    pub async fn add_vaccine(
        &self,
        command: AddVaccineCommand,
    ) -> Result<VaccineDefinition, DomainError> {
        let name = command
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let (name, age_in_weeks) = match (name, command.age_in_weeks) {
            (Some(name), Some(age_in_weeks)) => (name, age_in_weeks),
            _ => {
                return Err(DomainError::Validation(
                    "name and ageInWeeks are required".to_string(),
                ))
            }
        };

        let definition = self
            .catalog
            .insert_definition(NewVaccineDefinition {
                name: name.to_string(),
                age_in_weeks,
                is_default: command.is_default.unwrap_or(true),
            })
            .await?;

        info!("Added vaccine {} (due at {} weeks)", definition.name, definition.age_in_weeks);
        Ok(definition)
    }

    /// Remove a definition from the catalog
    pub async fn remove_vaccine(&self, definition_id: i64) -> Result<(), DomainError> {
        let deleted = self.catalog.delete_definition(definition_id).await?;
        if !deleted {
            return Err(DomainError::NotFound("Vaccine not found".to_string()));
        }

        info!("Removed vaccine {}", definition_id);
        Ok(())
    }

    /// Replace the default catalog with the built-in infant schedule.
    /// Existing non-default entries are left alone.
    pub async fn seed_defaults(&self) -> Result<u64, DomainError> {
        let seed: Vec<NewVaccineDefinition> = DEFAULT_SCHEDULE
            .iter()
            .map(|(name, age_in_weeks)| NewVaccineDefinition {
                name: (*name).to_string(),
                age_in_weeks: *age_in_weeks,
                is_default: true,
            })
            .collect();

        let inserted = self.catalog.replace_defaults(&seed).await?;
        info!("Seeded {} default vaccines", inserted);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::storage::sqlite::SqliteVaccineRepository;

    async fn setup_test() -> CatalogService {
        let db = DbConnection::init_in_memory()
            .await
            .expect("Failed to create test database");
        CatalogService::new(Arc::new(SqliteVaccineRepository::new(db)))
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let service = setup_test().await;

        let added = service
            .add_vaccine(AddVaccineCommand {
                name: Some("  BCG ".to_string()),
                age_in_weeks: Some(0),
                is_default: None,
            })
            .await
            .unwrap();

        assert_eq!(added.name, "BCG");
        assert!(added.is_default);

        let catalog = service.list_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_add_requires_name_and_age() {
        let service = setup_test().await;

        for command in [
            AddVaccineCommand { name: None, age_in_weeks: Some(6), is_default: None },
            AddVaccineCommand { name: Some("OPV-1".to_string()), age_in_weeks: None, is_default: None },
            AddVaccineCommand { name: Some("  ".to_string()), age_in_weeks: Some(6), is_default: None },
        ] {
            let err = service.add_vaccine(command).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_remove_missing_vaccine() {
        let service = setup_test().await;

        let err = service.remove_vaccine(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seed_defaults_installs_schedule_once() {
        let service = setup_test().await;

        let first = service.seed_defaults().await.unwrap();
        assert_eq!(first as usize, DEFAULT_SCHEDULE.len());

        // Reseeding replaces rather than accumulates
        let second = service.seed_defaults().await.unwrap();
        assert_eq!(second, first);
        assert_eq!(service.list_catalog().await.unwrap().len(), DEFAULT_SCHEDULE.len());
    }
}
