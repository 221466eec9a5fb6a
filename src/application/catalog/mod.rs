//! Catalog module: addresses and the smoking places on them

pub mod service;

pub use service::{AddressSummary, CatalogService, PlaceWithStatus};
