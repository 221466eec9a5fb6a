//! Reservations module: booking and managing one's own reservations

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
