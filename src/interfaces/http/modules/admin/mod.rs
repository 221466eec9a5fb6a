//! Admin module: addresses, places, users and every reservation.
//! All routes sit behind `require_admin`.

pub mod addresses;
pub mod dto;
pub mod reservations;
pub mod users;

pub use dto::*;
