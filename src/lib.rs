//! # Smoking Places
//!
//! Reservation service for shared smoking places: users book short,
//! non-overlapping time slots on a place; admins manage addresses, places,
//! users and every reservation.
//!
//! ## Architecture
//!
//! - **domain**: entities, slot rules, repository traits, clock
//! - **application**: conflict detection, occupancy, reservation lifecycle,
//!   catalog and identity services
//! - **infrastructure**: SeaORM persistence and crypto (bcrypt, JWT)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error types, upsert outcome, graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_router, AppState};
