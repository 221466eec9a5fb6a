//! Smoking place domain entity

/// Bookable place, numbered within its address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub id: i32,
    pub number: i32,
    pub address_id: i32,
}

/// Place joined with its address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceDetails {
    pub id: i32,
    pub number: i32,
    pub address_id: i32,
    pub city: String,
    pub street: String,
}
