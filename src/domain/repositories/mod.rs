//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::address::AddressRepository;
use super::place::PlaceRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Services receive this handle explicitly and request only the
/// repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let place = repos.places().find_by_id(3).await?;
///     let busy = repos.reservations().occupying(3, now).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn addresses(&self) -> &dyn AddressRepository;
    fn places(&self) -> &dyn PlaceRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn users(&self) -> &dyn UserRepository;
}
