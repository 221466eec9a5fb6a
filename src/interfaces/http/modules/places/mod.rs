//! Smoking places module: listing and status for users

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
