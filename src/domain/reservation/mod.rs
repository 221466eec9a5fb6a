//! Reservation aggregate
//!
//! Contains the Reservation entity, slot rules, and repository interface.

pub mod model;
pub mod repository;

pub use model::{
    NewReservation, OverlapProbe, Reservation, ReservationDetails, ReservationFilter, Slot,
    MAX_SLOT_MINUTES,
};
pub use repository::ReservationRepository;
