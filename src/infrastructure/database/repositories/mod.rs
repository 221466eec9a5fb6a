//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod address_repository;
pub mod place_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Map a SeaORM error onto the domain taxonomy. Only constraint
/// violations are surfaced with meaning; everything else is opaque.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::UniqueViolation(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::Validation("Referenced record does not exist".to_string())
        }
        _ => DomainError::Storage(e.to_string()),
    }
}
