//! Domain layer: models, commands, and the services that implement the
//! product's use cases over the storage traits.

pub mod commands;
pub mod errors;
pub mod models;
pub mod schedule;

mod auth_service;
mod catalog_service;
mod registration_service;
mod schedule_service;

pub use auth_service::AuthService;
pub use catalog_service::{CatalogService, DEFAULT_SCHEDULE};
pub use registration_service::RegistrationService;
pub use schedule_service::ScheduleService;
