//! Catalog service: address and place administration plus place browsing
//!
//! PUT-style writes create the record under the given id when it does not
//! exist yet. Deletes cascade through the repositories inside one
//! transaction.

use std::sync::Arc;

use tracing::info;

use crate::application::reservations::{OccupancyResolver, PlaceStatus};
use crate::domain::{
    Address, Clock, DomainError, DomainResult, Place, PlaceDetails, RepositoryProvider,
};
use crate::shared::Upserted;

/// Address with the number of places on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSummary {
    pub address: Address,
    pub sp_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceWithStatus<P> {
    pub place: P,
    pub status: PlaceStatus,
}

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
    occupancy: OccupancyResolver,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            occupancy: OccupancyResolver::new(repos.clone(), clock),
            repos,
        }
    }

    // ── Places (any authenticated user) ─────────────────────────

    pub async fn list_places(&self) -> DomainResult<Vec<PlaceWithStatus<PlaceDetails>>> {
        let places = self.repos.places().list_details().await?;
        let mut out = Vec::with_capacity(places.len());
        for place in places {
            let status = self.occupancy.status(place.id).await?;
            out.push(PlaceWithStatus { place, status });
        }
        Ok(out)
    }

    pub async fn get_place(&self, id: i32) -> DomainResult<PlaceWithStatus<PlaceDetails>> {
        let place = self
            .repos
            .places()
            .find_details(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Smoking place", id))?;
        let status = self.occupancy.status(id).await?;
        Ok(PlaceWithStatus { place, status })
    }

    // ── Addresses (admin) ───────────────────────────────────────

    pub async fn list_addresses(&self) -> DomainResult<Vec<AddressSummary>> {
        let addresses = self.repos.addresses().list().await?;
        let mut out = Vec::with_capacity(addresses.len());
        for address in addresses {
            let sp_amount = self.repos.places().count_on_address(address.id).await?;
            out.push(AddressSummary { address, sp_amount });
        }
        Ok(out)
    }

    pub async fn get_address(&self, id: i32) -> DomainResult<AddressSummary> {
        let address = self.require_address(id).await?;
        let sp_amount = self.repos.places().count_on_address(id).await?;
        Ok(AddressSummary { address, sp_amount })
    }

    pub async fn create_address(&self, city: &str, street: &str) -> DomainResult<Address> {
        let address = self.repos.addresses().insert(city, street, None).await?;
        info!(address_id = address.id, city, street, "Address created");
        Ok(address)
    }

    pub async fn put_address(
        &self,
        id: i32,
        city: &str,
        street: &str,
    ) -> DomainResult<Upserted<Address>> {
        let addresses = self.repos.addresses();
        if addresses.exists(id).await? {
            Ok(Upserted::Updated(addresses.update(id, city, street).await?))
        } else {
            let address = addresses.insert(city, street, Some(id)).await?;
            info!(address_id = id, "Address created by PUT");
            Ok(Upserted::Created(address))
        }
    }

    /// Removes the address with its places and their reservations
    pub async fn delete_address(&self, id: i32) -> DomainResult<()> {
        if !self.repos.addresses().delete_cascade(id).await? {
            return Err(DomainError::not_found("Address", id));
        }
        info!(address_id = id, "Address deleted");
        Ok(())
    }

    // ── Places on an address (admin) ────────────────────────────

    pub async fn list_places_on_address(
        &self,
        address_id: i32,
    ) -> DomainResult<Vec<PlaceWithStatus<Place>>> {
        self.require_address(address_id).await?;

        let places = self.repos.places().list_on_address(address_id).await?;
        let mut out = Vec::with_capacity(places.len());
        for place in places {
            let status = self.occupancy.status(place.id).await?;
            out.push(PlaceWithStatus { place, status });
        }
        Ok(out)
    }

    pub async fn get_place_on_address(
        &self,
        address_id: i32,
        id: i32,
    ) -> DomainResult<PlaceWithStatus<Place>> {
        let place = self.require_place_on(address_id, id).await?;
        let status = self.occupancy.status(id).await?;
        Ok(PlaceWithStatus { place, status })
    }

    pub async fn create_place(&self, address_id: i32, number: i32) -> DomainResult<Place> {
        self.require_address(address_id).await?;
        let place = self.repos.places().insert(address_id, number, None).await?;
        info!(place_id = place.id, address_id, number, "Smoking place created");
        Ok(place)
    }

    /// Renumber the place, or create it under `id` on this address.
    pub async fn put_place(
        &self,
        address_id: i32,
        id: i32,
        number: i32,
    ) -> DomainResult<Upserted<Place>> {
        self.require_address(address_id).await?;

        let places = self.repos.places();
        match places.find_by_id(id).await? {
            Some(existing) if existing.address_id != address_id => Err(DomainError::Validation(
                format!("Smoking place with id: {} belongs to another address", id),
            )),
            Some(_) => Ok(Upserted::Updated(places.update_number(id, number).await?)),
            None => {
                let place = places.insert(address_id, number, Some(id)).await?;
                info!(place_id = id, address_id, "Smoking place created by PUT");
                Ok(Upserted::Created(place))
            }
        }
    }

    /// Removes the place and its reservations
    pub async fn delete_place(&self, address_id: i32, id: i32) -> DomainResult<()> {
        self.require_place_on(address_id, id).await?;
        if !self.repos.places().delete_cascade(id).await? {
            return Err(DomainError::not_found("Smoking place", id));
        }
        info!(place_id = id, address_id, "Smoking place deleted");
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    async fn require_address(&self, id: i32) -> DomainResult<Address> {
        self.repos
            .addresses()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Address", id))
    }

    async fn require_place_on(&self, address_id: i32, id: i32) -> DomainResult<Place> {
        self.require_address(address_id).await?;
        self.repos
            .places()
            .find_on_address(address_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Smoking place", id))
    }
}
