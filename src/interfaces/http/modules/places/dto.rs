use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::PlaceWithStatus;
use crate::domain::PlaceDetails;

/// Smoking place with its location and current occupancy
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaceDto {
    pub id: i32,
    pub number: i32,
    pub city: String,
    pub street: String,
    /// `free` or `occupied until <end>`
    #[schema(example = "occupied until 2030-05-01 10:30:00")]
    pub status: String,
}

impl From<PlaceWithStatus<PlaceDetails>> for PlaceDto {
    fn from(p: PlaceWithStatus<PlaceDetails>) -> Self {
        Self {
            id: p.place.id,
            number: p.place.number,
            city: p.place.city,
            street: p.place.street,
            status: p.status.to_string(),
        }
    }
}
