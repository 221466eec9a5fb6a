//! Reservation repository interface

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::model::{
    NewReservation, OverlapProbe, Reservation, ReservationDetails, ReservationFilter, Slot,
};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// One reservation matched by `probe`, if any
    async fn find_overlapping(&self, probe: &OverlapProbe) -> DomainResult<Option<Reservation>>;

    /// Reservation on `place_id` whose interval contains `at` (inclusive)
    async fn occupying(&self, place_id: i32, at: NaiveDateTime)
        -> DomainResult<Option<Reservation>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    async fn exists(&self, id: i32) -> DomainResult<bool>;

    /// Insert a reservation. `id` is store-assigned unless supplied.
    async fn insert(&self, record: NewReservation, id: Option<i32>) -> DomainResult<Reservation>;

    /// Overwrite every field of an existing reservation
    async fn replace(&self, id: i32, record: NewReservation) -> DomainResult<Reservation>;

    /// Move an existing reservation to another place and/or slot, keeping the owner
    async fn update(&self, id: i32, place_id: i32, slot: Slot) -> DomainResult<Reservation>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: i32) -> DomainResult<bool>;

    /// Deletes only when owned by `user_id`; returns whether a row was deleted
    async fn delete_owned(&self, id: i32, user_id: i32) -> DomainResult<bool>;

    /// Joined listing ordered by start time
    async fn list_details(&self, filter: ReservationFilter)
        -> DomainResult<Vec<ReservationDetails>>;
}
