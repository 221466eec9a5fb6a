//! SeaORM implementation of AddressRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::db_err;
use crate::domain::{Address, AddressRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::{address, reservation, smoking_place};

pub struct SeaOrmAddressRepository {
    db: DatabaseConnection,
}

impl SeaOrmAddressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: address::Model) -> Address {
    Address {
        id: m.id,
        city: m.city,
        street: m.street,
    }
}

#[async_trait]
impl AddressRepository for SeaOrmAddressRepository {
    async fn list(&self) -> DomainResult<Vec<Address>> {
        let models = address::Entity::find()
            .order_by_asc(address::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Address>> {
        let model = address::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists(&self, id: i32) -> DomainResult<bool> {
        let count = address::Entity::find()
            .filter(address::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, city: &str, street: &str, id: Option<i32>) -> DomainResult<Address> {
        debug!(city, street, ?id, "Inserting address");

        let mut model = address::ActiveModel {
            city: Set(city.to_string()),
            street: Set(street.to_string()),
            ..Default::default()
        };
        if let Some(id) = id {
            model.id = Set(id);
        }

        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn update(&self, id: i32, city: &str, street: &str) -> DomainResult<Address> {
        let existing = address::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Address", id))?;

        let mut active: address::ActiveModel = existing.into();
        active.city = Set(city.to_string());
        active.street = Set(street.to_string());

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let place_ids: Vec<i32> = smoking_place::Entity::find()
            .select_only()
            .column(smoking_place::Column::Id)
            .filter(smoking_place::Column::AddressId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        if !place_ids.is_empty() {
            let removed = reservation::Entity::delete_many()
                .filter(reservation::Column::PlaceId.is_in(place_ids.clone()))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            smoking_place::Entity::delete_many()
                .filter(smoking_place::Column::AddressId.eq(id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            debug!(
                address_id = id,
                places = place_ids.len(),
                reservations = removed.rows_affected,
                "Cascaded address delete"
            );
        }

        let result = address::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
