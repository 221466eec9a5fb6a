//! Reservation core: conflict detection, occupancy and lifecycle

pub mod conflict;
pub mod occupancy;
pub mod service;

pub use conflict::ConflictDetector;
pub use occupancy::{OccupancyResolver, PlaceStatus};
pub use service::{PlaceLocation, ReservationService};
