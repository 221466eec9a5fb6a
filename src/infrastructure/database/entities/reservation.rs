//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    pub place_id: i32,

    /// Naive local time, compared as stored
    pub starts_at: DateTime,
    pub ends_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::smoking_place::Entity",
        from = "Column::PlaceId",
        to = "super::smoking_place::Column::Id",
        on_delete = "Cascade"
    )]
    SmokingPlace,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::smoking_place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SmokingPlace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
