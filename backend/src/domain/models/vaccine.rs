use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::VaccineStatus;

/// Master-data record describing a vaccine and the age at which it is due.
///
/// Immutable from the schedule logic's point of view; only the seed process
/// and the admin endpoints touch this table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineDefinition {
    pub id: i64,
    pub name: String,
    /// Completed weeks since birth at which the dose is due
    pub age_in_weeks: u32,
    /// Whether registering a child schedules this dose automatically
    pub is_default: bool,
}

/// A vaccine definition that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewVaccineDefinition {
    pub name: String,
    pub age_in_weeks: u32,
    pub is_default: bool,
}

/// One scheduled dose for a registered child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildVaccineRecord {
    pub id: i64,
    pub owner_user_id: i64,
    pub baby_name: String,
    pub date_of_birth: NaiveDate,
    pub vaccine_id: i64,
    pub scheduled_date: NaiveDate,
    pub status: VaccineStatus,
}

/// A scheduled dose that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChildVaccineRecord {
    pub owner_user_id: i64,
    pub baby_name: String,
    pub date_of_birth: NaiveDate,
    pub vaccine_id: i64,
    pub scheduled_date: NaiveDate,
    pub status: VaccineStatus,
}

/// A persisted dose joined to its vaccine definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildScheduleEntry {
    pub record: ChildVaccineRecord,
    pub vaccine: VaccineDefinition,
}
