//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `middleware`: Basic / Bearer authentication and the admin gate
//! - `modules`: handlers grouped by resource
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

#[cfg(test)]
mod tests;

pub use router::{create_router, ApiDoc};
pub use state::AppState;
