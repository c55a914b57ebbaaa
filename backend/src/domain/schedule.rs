//! Derivation of a child's vaccine schedule from the master catalog.

use chrono::{Duration, NaiveDate};
use shared::VaccineStatus;

use crate::domain::models::vaccine::VaccineDefinition;

/// A dose scheduled for a particular date, before it is tied to an owner
/// and child.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledDose {
    pub vaccine_id: i64,
    pub scheduled_date: NaiveDate,
    pub status: VaccineStatus,
}

/// Compute one pending dose per definition, due `age_in_weeks * 7` days
/// after the date of birth.
///
/// Pure calendar-day arithmetic on date-only values; the output always has
/// exactly one entry per input definition, and an empty catalog yields an
/// empty schedule.
pub fn scheduled_doses(
    definitions: &[VaccineDefinition],
    date_of_birth: NaiveDate,
) -> Vec<ScheduledDose> {
    definitions
        .iter()
        .map(|vaccine| ScheduledDose {
            vaccine_id: vaccine.id,
            scheduled_date: date_of_birth + Duration::days(7 * i64::from(vaccine.age_in_weeks)),
            status: VaccineStatus::Pending,
        })
        .collect()
}
