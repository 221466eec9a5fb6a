//! Domain layer: entities, slot rules and repository interfaces

pub mod address;
pub mod clock;
pub mod place;
pub mod repositories;
pub mod reservation;
pub mod user;

pub use address::{Address, AddressRepository};
pub use clock::{Clock, FixedClock, SystemClock};
pub use place::{Place, PlaceDetails, PlaceRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    NewReservation, OverlapProbe, Reservation, ReservationDetails, ReservationFilter,
    ReservationRepository, Slot,
};
pub use user::{CreateUserDto, User, UserRepository, UserRole};

pub use crate::shared::errors::{DomainError, SlotViolation};
