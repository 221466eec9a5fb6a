//! Address entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub city: String,
    #[sea_orm(unique)]
    pub street: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::smoking_place::Entity")]
    SmokingPlaces,
}

impl Related<super::smoking_place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SmokingPlaces.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
