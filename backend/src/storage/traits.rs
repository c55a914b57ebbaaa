//! # Storage Traits
//!
//! Storage abstraction traits that keep the domain layer independent of the
//! concrete persistence backend. Services receive these as trait objects, so
//! the schedule logic is testable against any store.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::user::{NewUser, User};
use crate::domain::models::vaccine::{
    ChildScheduleEntry, ChildVaccineRecord, NewChildVaccineRecord, NewVaccineDefinition,
    VaccineDefinition,
};

/// Trait defining the interface for user account storage operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user, returning it with its assigned id
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    /// Look up a user by (already normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by id
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>>;
}

/// Trait defining the interface to the master vaccine catalog
#[async_trait]
pub trait VaccineCatalog: Send + Sync {
    /// Store a new definition, returning it with its assigned id
    async fn insert_definition(&self, definition: NewVaccineDefinition)
        -> Result<VaccineDefinition>;

    /// List every definition in the catalog
    async fn list_all(&self) -> Result<Vec<VaccineDefinition>>;

    /// List the definitions scheduled automatically on registration
    async fn list_defaults(&self) -> Result<Vec<VaccineDefinition>>;

    /// Delete a definition by id
    /// Returns true if the definition was found and deleted, false otherwise
    async fn delete_definition(&self, definition_id: i64) -> Result<bool>;

    /// Replace all default definitions with the given seed set, leaving
    /// non-default entries untouched. Returns the number of rows inserted.
    async fn replace_defaults(&self, definitions: &[NewVaccineDefinition]) -> Result<u64>;
}

/// Trait defining the interface for per-child scheduled dose storage
#[async_trait]
pub trait ChildVaccineRecordStore: Send + Sync {
    /// Persist all drafts in a single bulk operation.
    /// Returns the number of rows inserted.
    async fn insert_many(&self, records: &[NewChildVaccineRecord]) -> Result<u64>;

    /// Drop any existing records for (owner, baby name) and persist the
    /// drafts in their place, atomically. Returns the number of rows inserted.
    async fn replace_for_child(
        &self,
        owner_user_id: i64,
        baby_name: &str,
        records: &[NewChildVaccineRecord],
    ) -> Result<u64>;

    /// Whether any record exists for (owner, baby name)
    async fn exists_for_child(&self, owner_user_id: i64, baby_name: &str) -> Result<bool>;

    /// Distinct baby names registered by this owner, sorted by name
    async fn list_child_names(&self, owner_user_id: i64) -> Result<Vec<String>>;

    /// All records for (owner, baby name), joined to their definitions,
    /// sorted ascending by scheduled date
    async fn list_for_child(
        &self,
        owner_user_id: i64,
        baby_name: &str,
    ) -> Result<Vec<ChildScheduleEntry>>;

    /// Transition a record owned by this user to Done.
    /// Returns the updated record, or None when it does not exist or belongs
    /// to someone else.
    async fn mark_done(
        &self,
        owner_user_id: i64,
        record_id: i64,
    ) -> Result<Option<ChildVaccineRecord>>;
}
