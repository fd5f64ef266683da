use sea_orm_migration::{prelude::*, schema::*};

use super::m20250810_000001_create_users::User;
use super::m20250810_000005_create_flights::Flight;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FlightStaff::Table)
                    .if_not_exists()
                    .col(uuid(FlightStaff::FlightId).not_null())
                    .col(uuid(FlightStaff::UserId).not_null())
                    .primary_key(
                        Index::create()
                            .col(FlightStaff::FlightId)
                            .col(FlightStaff::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_staff_flight")
                            .from(FlightStaff::Table, FlightStaff::FlightId)
                            .to(Flight::Table, Flight::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_staff_user")
                            .from(FlightStaff::Table, FlightStaff::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlightStaff::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FlightStaff {
    Table,
    FlightId,
    UserId,
}
