//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates registration, login,
//! credential checks for every request and admin user management.

pub mod service;

pub use service::{AuthResult, NewUser, UserService, MIN_PASSWORD_LEN};
