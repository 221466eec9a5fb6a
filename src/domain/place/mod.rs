//! Smoking place aggregate

pub mod model;
pub mod repository;

pub use model::{Place, PlaceDetails};
pub use repository::PlaceRepository;
