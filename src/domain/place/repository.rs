//! Smoking place repository interface

use async_trait::async_trait;

use super::model::{Place, PlaceDetails};
use crate::domain::DomainResult;

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn list_details(&self) -> DomainResult<Vec<PlaceDetails>>;

    async fn find_details(&self, id: i32) -> DomainResult<Option<PlaceDetails>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Place>>;

    async fn exists(&self, id: i32) -> DomainResult<bool>;

    async fn list_on_address(&self, address_id: i32) -> DomainResult<Vec<Place>>;

    async fn find_on_address(&self, address_id: i32, id: i32) -> DomainResult<Option<Place>>;

    /// Resolve a place from its human-facing location
    async fn find_id_by_location(
        &self,
        number: i32,
        city: &str,
        street: &str,
    ) -> DomainResult<Option<i32>>;

    async fn count_on_address(&self, address_id: i32) -> DomainResult<u64>;

    /// Insert a place. `id` is store-assigned unless supplied.
    async fn insert(&self, address_id: i32, number: i32, id: Option<i32>) -> DomainResult<Place>;

    async fn update_number(&self, id: i32, number: i32) -> DomainResult<Place>;

    /// Delete the place and its reservations atomically
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}
