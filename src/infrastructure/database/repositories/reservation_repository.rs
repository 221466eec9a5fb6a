//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::debug;

use super::db_err;
use crate::domain::reservation::{
    NewReservation, OverlapProbe, Reservation, ReservationDetails, ReservationFilter,
    ReservationRepository, Slot,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{address, reservation, smoking_place, user};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        place_id: m.place_id,
        user_id: m.user_id,
        slot: Slot::new(m.starts_at, m.ends_at),
    }
}

/// `at` lies within `[starts_at, ends_at]`
fn contains(at: NaiveDateTime) -> Condition {
    Condition::all()
        .add(reservation::Column::StartsAt.lte(at))
        .add(reservation::Column::EndsAt.gte(at))
}

#[derive(Debug, FromQueryResult)]
struct DetailsRow {
    id: i32,
    user_id: i32,
    username: String,
    place_id: i32,
    place_number: i32,
    city: String,
    street: String,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
}

impl From<DetailsRow> for ReservationDetails {
    fn from(row: DetailsRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            place_id: row.place_id,
            place_number: row.place_number,
            city: row.city,
            street: row.street,
            start: row.starts_at,
            end: row.ends_at,
        }
    }
}

impl SeaOrmReservationRepository {
    async fn find_model(&self, id: i32) -> DomainResult<reservation::Model> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_overlapping(&self, probe: &OverlapProbe) -> DomainResult<Option<Reservation>> {
        let related = Condition::any()
            .add(reservation::Column::PlaceId.eq(probe.place_id))
            .add(reservation::Column::UserId.eq(probe.user_id));
        let touched = Condition::any()
            .add(contains(probe.slot.start))
            .add(contains(probe.slot.end));

        let mut query = reservation::Entity::find().filter(related).filter(touched);
        if let Some(exclude_id) = probe.exclude_id {
            query = query.filter(reservation::Column::Id.ne(exclude_id));
        }

        let model = query
            .order_by_asc(reservation::Column::StartsAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn occupying(
        &self,
        place_id: i32,
        at: NaiveDateTime,
    ) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find()
            .filter(reservation::Column::PlaceId.eq(place_id))
            .filter(contains(at))
            .order_by_asc(reservation::Column::StartsAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists(&self, id: i32) -> DomainResult<bool> {
        let count = reservation::Entity::find()
            .filter(reservation::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, record: NewReservation, id: Option<i32>) -> DomainResult<Reservation> {
        debug!(place_id = record.place_id, user_id = record.user_id, ?id, "Inserting reservation");

        let mut model = reservation::ActiveModel {
            user_id: Set(record.user_id),
            place_id: Set(record.place_id),
            starts_at: Set(record.slot.start),
            ends_at: Set(record.slot.end),
            ..Default::default()
        };
        if let Some(id) = id {
            model.id = Set(id);
        }

        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn replace(&self, id: i32, record: NewReservation) -> DomainResult<Reservation> {
        debug!(id, "Replacing reservation");

        let mut active: reservation::ActiveModel = self.find_model(id).await?.into();
        active.user_id = Set(record.user_id);
        active.place_id = Set(record.place_id);
        active.starts_at = Set(record.slot.start);
        active.ends_at = Set(record.slot.end);

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn update(&self, id: i32, place_id: i32, slot: Slot) -> DomainResult<Reservation> {
        debug!(id, place_id, "Updating reservation");

        let mut active: reservation::ActiveModel = self.find_model(id).await?.into();
        active.place_id = Set(place_id);
        active.starts_at = Set(slot.start);
        active.ends_at = Set(slot.end);

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let result = reservation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_owned(&self, id: i32, user_id: i32) -> DomainResult<bool> {
        let result = reservation::Entity::delete_many()
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_details(
        &self,
        filter: ReservationFilter,
    ) -> DomainResult<Vec<ReservationDetails>> {
        let mut query = reservation::Entity::find()
            .select_only()
            .column_as(reservation::Column::Id, "id")
            .column_as(reservation::Column::UserId, "user_id")
            .column_as(user::Column::Username, "username")
            .column_as(reservation::Column::PlaceId, "place_id")
            .column_as(smoking_place::Column::Number, "place_number")
            .column_as(address::Column::City, "city")
            .column_as(address::Column::Street, "street")
            .column_as(reservation::Column::StartsAt, "starts_at")
            .column_as(reservation::Column::EndsAt, "ends_at")
            .join(JoinType::InnerJoin, reservation::Relation::User.def())
            .join(JoinType::InnerJoin, reservation::Relation::SmokingPlace.def())
            .join(JoinType::InnerJoin, smoking_place::Relation::Address.def());

        if let Some(id) = filter.id {
            query = query.filter(reservation::Column::Id.eq(id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(reservation::Column::UserId.eq(user_id));
        }
        if let Some(after) = filter.ends_at_or_after {
            query = query.filter(reservation::Column::EndsAt.gte(after));
        }

        let rows = query
            .order_by_asc(reservation::Column::StartsAt)
            .order_by_asc(reservation::Column::Id)
            .into_model::<DetailsRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(ReservationDetails::from).collect())
    }
}
