//! Reservation DTOs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{ReservationDetails, Slot};

/// Body of `POST /smoking-places/{sp_id}/reservation`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReservationRequest {
    #[schema(value_type = String, example = "2030-05-01T10:00:00")]
    pub start: NaiveDateTime,
    #[schema(value_type = String, example = "2030-05-01T10:30:00")]
    pub end: NaiveDateTime,
}

impl ReservationRequest {
    pub fn slot(&self) -> Slot {
        Slot::new(self.start, self.end)
    }
}

/// Body of `PUT /reservations/my-reservations/{res_id}`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceReservationRequest {
    pub sp_number: i32,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "street is required"))]
    pub street: String,
    #[schema(value_type = String, example = "2030-05-01T10:00:00")]
    pub start: NaiveDateTime,
    #[schema(value_type = String, example = "2030-05-01T10:30:00")]
    pub end: NaiveDateTime,
}

/// Body of `PUT /admin/reservations/{res_id}`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminReservationRequest {
    pub smoking_place_id: i32,
    pub user_id: i32,
    #[schema(value_type = String, example = "2030-05-01T10:00:00")]
    pub start: NaiveDateTime,
    #[schema(value_type = String, example = "2030-05-01T10:30:00")]
    pub end: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub reservation_id: i32,
    /// Omitted on the caller's own reservations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub sp_number: i32,
    pub city: String,
    pub street: String,
    #[schema(value_type = String)]
    pub start: NaiveDateTime,
    #[schema(value_type = String)]
    pub end: NaiveDateTime,
}

impl ReservationDto {
    /// View for listings across users
    pub fn with_owner(d: ReservationDetails) -> Self {
        Self {
            username: Some(d.username.clone()),
            ..Self::own(d)
        }
    }

    /// View of the caller's own reservation
    pub fn own(d: ReservationDetails) -> Self {
        Self {
            reservation_id: d.id,
            username: None,
            sp_number: d.place_number,
            city: d.city,
            street: d.street,
            start: d.start,
            end: d.end,
        }
    }
}
