//! Create smoking_places table
//!
//! A place number is unique within its address.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_addresses::Addresses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SmokingPlaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SmokingPlaces::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SmokingPlaces::Number).integer().not_null())
                    .col(ColumnDef::new(SmokingPlaces::AddressId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_smoking_places_address")
                            .from(SmokingPlaces::Table, SmokingPlaces::AddressId)
                            .to(Addresses::Table, Addresses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_smoking_places_address_number")
                    .table(SmokingPlaces::Table)
                    .col(SmokingPlaces::AddressId)
                    .col(SmokingPlaces::Number)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SmokingPlaces::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SmokingPlaces {
    Table,
    Id,
    Number,
    AddressId,
}
