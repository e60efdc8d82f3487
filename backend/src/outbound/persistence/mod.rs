//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin translators between row structs and domain types.
//! Row structs (`models`) and table definitions (`schema`) stay private to
//! this module. Connections come from a `bb8` pool through `diesel-async`;
//! migrations are embedded and applied over a blocking connection.
//!
//! ```ignore
//! use partfinder::outbound::persistence::{DbPool, DieselProfileRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/partfinder")).await?;
//! let profiles = DieselProfileRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_notification_repository;
mod diesel_profile_repository;
mod diesel_request_repository;
mod diesel_response_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_request_repository::DieselRequestRepository;
pub use diesel_response_repository::DieselResponseRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
