use log::{debug, info};
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::models::vaccine::{ChildScheduleEntry, ChildVaccineRecord};
use crate::storage::traits::ChildVaccineRecordStore;

/// Service for reading a user's registered children and their schedules
#[derive(Clone)]
pub struct ScheduleService {
    records: Arc<dyn ChildVaccineRecordStore>,
}

impl ScheduleService {
    pub fn new(records: Arc<dyn ChildVaccineRecordStore>) -> Self {
        Self { records }
    }

    /// Distinct baby names registered by this user
    pub async fn list_children(&self, owner_user_id: i64) -> Result<Vec<String>, DomainError> {
        let children = self.records.list_child_names(owner_user_id).await?;
        debug!("User {} has {} registered children", owner_user_id, children.len());
        Ok(children)
    }

    /// A child's schedule, joined to the vaccine definitions and sorted
    /// ascending by scheduled date. An unknown baby name yields an empty
    /// list, not an error.
    pub async fn list_vaccines(
        &self,
        owner_user_id: i64,
        baby_name: Option<String>,
    ) -> Result<Vec<ChildScheduleEntry>, DomainError> {
        let baby_name = baby_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                DomainError::Validation("babyName query param is required".to_string())
            })?;

        let entries = self.records.list_for_child(owner_user_id, baby_name).await?;
        debug!(
            "User {} child {} has {} scheduled vaccines",
            owner_user_id,
            baby_name,
            entries.len()
        );
        Ok(entries)
    }

    /// Transition one of the caller's scheduled doses to Done
    pub async fn mark_done(
        &self,
        owner_user_id: i64,
        record_id: i64,
    ) -> Result<ChildVaccineRecord, DomainError> {
        let record = self
            .records
            .mark_done(owner_user_id, record_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Vaccine record not found".to_string()))?;

        info!("User {} marked vaccine record {} done", owner_user_id, record_id);
        Ok(record)
    }
}
