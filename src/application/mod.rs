//! Application layer: use-case services over the repository provider

pub mod catalog;
pub mod identity;
pub mod reservations;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{AddressSummary, CatalogService, PlaceWithStatus};
pub use identity::{AuthResult, NewUser, UserService};
pub use reservations::{
    ConflictDetector, OccupancyResolver, PlaceLocation, PlaceStatus, ReservationService,
};
