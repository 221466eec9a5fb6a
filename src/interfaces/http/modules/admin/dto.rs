//! Admin DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{AddressSummary, PlaceWithStatus};
use crate::domain::{Address, Place};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddressRequest {
    #[validate(length(min = 1, max = 100, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 200, message = "street is required"))]
    pub street: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub id: i32,
    pub city: String,
    pub street: String,
    /// Number of smoking places on the address, listings only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_amount: Option<u64>,
}

impl From<Address> for AddressDto {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            city: a.city,
            street: a.street,
            sp_amount: None,
        }
    }
}

impl From<AddressSummary> for AddressDto {
    fn from(s: AddressSummary) -> Self {
        Self {
            sp_amount: Some(s.sp_amount),
            ..Self::from(s.address)
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceRequest {
    #[validate(range(min = 1, message = "number must be positive"))]
    pub number: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminPlaceDto {
    pub id: i32,
    pub number: i32,
    pub address_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<Place> for AdminPlaceDto {
    fn from(p: Place) -> Self {
        Self {
            id: p.id,
            number: p.number,
            address_id: p.address_id,
            status: None,
        }
    }
}

impl From<PlaceWithStatus<Place>> for AdminPlaceDto {
    fn from(p: PlaceWithStatus<Place>) -> Self {
        Self {
            status: Some(p.status.to_string()),
            ..Self::from(p.place)
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoleRequest {
    /// `user` or `admin`
    pub role: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReservationListQuery {
    /// Include reservations that already ended
    #[serde(default)]
    pub include_past: bool,
}
