//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{AddressRepository, PlaceRepository, ReservationRepository, UserRepository};

use super::address_repository::SeaOrmAddressRepository;
use super::place_repository::SeaOrmPlaceRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let place = repos.places().find_details(3).await?;
/// let busy = repos.reservations().occupying(3, now).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    addresses: SeaOrmAddressRepository,
    places: SeaOrmPlaceRepository,
    reservations: SeaOrmReservationRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            addresses: SeaOrmAddressRepository::new(db.clone()),
            places: SeaOrmPlaceRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn addresses(&self) -> &dyn AddressRepository {
        &self.addresses
    }

    fn places(&self) -> &dyn PlaceRepository {
        &self.places
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
