use chrono::NaiveDate;
use log::info;
use shared::DuplicatePolicy;
use std::sync::Arc;

use crate::domain::commands::child::{RegisterChildCommand, RegisterChildResult};
use crate::domain::errors::DomainError;
use crate::domain::models::vaccine::NewChildVaccineRecord;
use crate::domain::schedule;
use crate::storage::traits::{ChildVaccineRecordStore, VaccineCatalog};

/// Service for registering a child and generating its vaccine schedule
#[derive(Clone)]
pub struct RegistrationService {
    catalog: Arc<dyn VaccineCatalog>,
    records: Arc<dyn ChildVaccineRecordStore>,
}

impl RegistrationService {
    pub fn new(
        catalog: Arc<dyn VaccineCatalog>,
        records: Arc<dyn ChildVaccineRecordStore>,
    ) -> Self {
        Self { catalog, records }
    }

    /// Register a child: derive one pending dose per default vaccine and
    /// persist them in a single bulk write.
    ///
    /// The date of birth must parse strictly as YYYY-MM-DD; a malformed date
    /// is a validation error, never a silently wrong schedule.
    pub async fn register_child(
        &self,
        owner_user_id: i64,
        command: RegisterChildCommand,
    ) -> Result<RegisterChildResult, DomainError> {
        let (baby_name, date_of_birth) = match (&command.baby_name, &command.date_of_birth) {
            (Some(baby_name), Some(date_of_birth))
                if !baby_name.trim().is_empty() && !date_of_birth.trim().is_empty() =>
            {
                (baby_name.trim().to_string(), date_of_birth.trim())
            }
            _ => {
                return Err(DomainError::Validation(
                    "babyName and dateOfBirth are required".to_string(),
                ))
            }
        };

        let date_of_birth = NaiveDate::parse_from_str(date_of_birth, "%Y-%m-%d").map_err(|_| {
            DomainError::Validation(
                "dateOfBirth must be a valid date in YYYY-MM-DD format".to_string(),
            )
        })?;

        let policy = command.on_duplicate.unwrap_or_default();
        let already_registered = self
            .records
            .exists_for_child(owner_user_id, &baby_name)
            .await?;

        if already_registered && policy == DuplicatePolicy::Reject {
            return Err(DomainError::DuplicateChild(baby_name));
        }

        let defaults = self.catalog.list_defaults().await?;

        let drafts: Vec<NewChildVaccineRecord> = schedule::scheduled_doses(&defaults, date_of_birth)
            .into_iter()
            .map(|dose| NewChildVaccineRecord {
                owner_user_id,
                baby_name: baby_name.clone(),
                date_of_birth,
                vaccine_id: dose.vaccine_id,
                scheduled_date: dose.scheduled_date,
                status: dose.status,
            })
            .collect();

        let inserted = if already_registered && policy == DuplicatePolicy::Replace {
            self.records
                .replace_for_child(owner_user_id, &baby_name, &drafts)
                .await?
        } else {
            self.records.insert_many(&drafts).await?
        };

        info!(
            "Registered child {} for user {} with {} scheduled vaccines",
            baby_name, owner_user_id, inserted
        );

        Ok(RegisterChildResult {
            baby_name,
            vaccines_count: inserted as usize,
        })
    }
}
