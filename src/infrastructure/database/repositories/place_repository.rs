//! SeaORM implementation of PlaceRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use tracing::debug;

use super::db_err;
use crate::domain::{DomainError, DomainResult, Place, PlaceDetails, PlaceRepository};
use crate::infrastructure::database::entities::{address, reservation, smoking_place};

pub struct SeaOrmPlaceRepository {
    db: DatabaseConnection,
}

impl SeaOrmPlaceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: smoking_place::Model) -> Place {
    Place {
        id: m.id,
        number: m.number,
        address_id: m.address_id,
    }
}

#[derive(Debug, FromQueryResult)]
struct DetailsRow {
    id: i32,
    number: i32,
    address_id: i32,
    city: String,
    street: String,
}

impl From<DetailsRow> for PlaceDetails {
    fn from(row: DetailsRow) -> Self {
        Self {
            id: row.id,
            number: row.number,
            address_id: row.address_id,
            city: row.city,
            street: row.street,
        }
    }
}

/// Places joined with their address
fn details_query() -> Select<smoking_place::Entity> {
    smoking_place::Entity::find()
        .select_only()
        .column_as(smoking_place::Column::Id, "id")
        .column_as(smoking_place::Column::Number, "number")
        .column_as(smoking_place::Column::AddressId, "address_id")
        .column_as(address::Column::City, "city")
        .column_as(address::Column::Street, "street")
        .join(JoinType::InnerJoin, smoking_place::Relation::Address.def())
}

// ── PlaceRepository impl ────────────────────────────────────────

#[async_trait]
impl PlaceRepository for SeaOrmPlaceRepository {
    async fn list_details(&self) -> DomainResult<Vec<PlaceDetails>> {
        let rows = details_query()
            .order_by_asc(smoking_place::Column::Id)
            .into_model::<DetailsRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(PlaceDetails::from).collect())
    }

    async fn find_details(&self, id: i32) -> DomainResult<Option<PlaceDetails>> {
        let row = details_query()
            .filter(smoking_place::Column::Id.eq(id))
            .into_model::<DetailsRow>()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(PlaceDetails::from))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Place>> {
        let model = smoking_place::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists(&self, id: i32) -> DomainResult<bool> {
        let count = smoking_place::Entity::find()
            .filter(smoking_place::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn list_on_address(&self, address_id: i32) -> DomainResult<Vec<Place>> {
        let models = smoking_place::Entity::find()
            .filter(smoking_place::Column::AddressId.eq(address_id))
            .order_by_asc(smoking_place::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_on_address(&self, address_id: i32, id: i32) -> DomainResult<Option<Place>> {
        let model = smoking_place::Entity::find()
            .filter(smoking_place::Column::Id.eq(id))
            .filter(smoking_place::Column::AddressId.eq(address_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_id_by_location(
        &self,
        number: i32,
        city: &str,
        street: &str,
    ) -> DomainResult<Option<i32>> {
        let id: Option<i32> = smoking_place::Entity::find()
            .select_only()
            .column(smoking_place::Column::Id)
            .join(JoinType::InnerJoin, smoking_place::Relation::Address.def())
            .filter(smoking_place::Column::Number.eq(number))
            .filter(address::Column::City.eq(city))
            .filter(address::Column::Street.eq(street))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(id)
    }

    async fn count_on_address(&self, address_id: i32) -> DomainResult<u64> {
        smoking_place::Entity::find()
            .filter(smoking_place::Column::AddressId.eq(address_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn insert(&self, address_id: i32, number: i32, id: Option<i32>) -> DomainResult<Place> {
        debug!(address_id, number, ?id, "Inserting smoking place");

        let mut model = smoking_place::ActiveModel {
            number: Set(number),
            address_id: Set(address_id),
            ..Default::default()
        };
        if let Some(id) = id {
            model.id = Set(id);
        }

        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn update_number(&self, id: i32, number: i32) -> DomainResult<Place> {
        let existing = smoking_place::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Smoking place", id))?;

        let mut active: smoking_place::ActiveModel = existing.into();
        active.number = Set(number);

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let removed = reservation::Entity::delete_many()
            .filter(reservation::Column::PlaceId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = smoking_place::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!(place_id = id, reservations = removed.rows_affected, "Cascaded place delete");
        Ok(result.rows_affected > 0)
    }
}
