use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request body for POST /api/auth/signup.
///
/// Fields are optional so the server can answer a 400 with a useful message
/// instead of a bare deserialization failure when the client omits one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// "admin" or "user"; defaults to "user" when omitted
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Public view of a user account (never includes the password hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user: UserInfo,
}

/// Request body for POST /api/auth/login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token for subsequent authenticated requests
    pub token: String,
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Child registration
// ---------------------------------------------------------------------------

/// What to do when a child with the same name is already registered for
/// this account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Refuse the registration and leave the existing schedule untouched
    Reject,
    /// Drop the existing schedule and build a fresh one
    Replace,
    /// Add a second full schedule alongside the existing one
    Append,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Append
    }
}

/// Request body for POST /api/user/register-child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChildRequest {
    pub baby_name: Option<String>,
    /// Date of birth in YYYY-MM-DD
    pub date_of_birth: Option<String>,
    /// Duplicate-registration policy; defaults to "append"
    pub on_duplicate: Option<DuplicatePolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChildResponse {
    pub message: String,
    pub baby_name: String,
    pub vaccines_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenResponse {
    pub children: Vec<String>,
}

// ---------------------------------------------------------------------------
// Vaccine schedule
// ---------------------------------------------------------------------------

/// Lifecycle of a scheduled vaccine dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaccineStatus {
    Pending,
    Done,
}

impl VaccineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaccineStatus::Pending => "Pending",
            VaccineStatus::Done => "Done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(VaccineStatus::Pending),
            "Done" => Some(VaccineStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for VaccineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Master-data view of a vaccine definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineInfo {
    pub id: i64,
    pub name: String,
    /// Age at which the dose is due, in completed weeks since birth
    pub age_in_weeks: u32,
    pub is_default: bool,
}

/// One scheduled dose for a registered child, joined to its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVaccine {
    pub id: i64,
    pub baby_name: String,
    pub date_of_birth: NaiveDate,
    pub scheduled_date: NaiveDate,
    pub status: VaccineStatus,
    pub vaccine: VaccineInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinesResponse {
    pub vaccines: Vec<ScheduledVaccine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkVaccineDoneResponse {
    pub message: String,
    pub id: i64,
    pub status: VaccineStatus,
}

// ---------------------------------------------------------------------------
// Catalog administration
// ---------------------------------------------------------------------------

/// Request body for POST /api/admin/vaccines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVaccineRequest {
    pub name: Option<String>,
    pub age_in_weeks: Option<u32>,
    /// Whether new registrations should schedule this dose; defaults to true
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub vaccines: Vec<VaccineInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
