//! Address repository interface

use async_trait::async_trait;

use super::model::Address;
use crate::domain::DomainResult;

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<Address>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Address>>;

    async fn exists(&self, id: i32) -> DomainResult<bool>;

    /// Insert an address. `id` is store-assigned unless supplied.
    async fn insert(&self, city: &str, street: &str, id: Option<i32>) -> DomainResult<Address>;

    async fn update(&self, id: i32, city: &str, street: &str) -> DomainResult<Address>;

    /// Delete the address, its places and their reservations atomically
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}
