use sea_orm_migration::{prelude::*, schema::*};

use super::m20250810_000002_create_planes::Plane;
use super::m20250810_000004_create_flight_statuses::FlightStatus;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Flight::Table)
                    .if_not_exists()
                    .col(uuid(Flight::Id).primary_key())
                    .col(string_len(Flight::Origin, 100).not_null())
                    .col(string_len(Flight::Destination, 100).not_null())
                    .col(timestamp_with_time_zone(Flight::DepartureDate).not_null())
                    .col(timestamp_with_time_zone(Flight::ArrivalDate).not_null())
                    .col(decimal_len(Flight::BasePrice, 10, 2).not_null())
                    .col(integer(Flight::StatusId).not_null())
                    .col(uuid(Flight::PlaneId).not_null())
                    .col(
                        timestamp_with_time_zone(Flight::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_status")
                            .from(Flight::Table, Flight::StatusId)
                            .to(FlightStatus::Table, FlightStatus::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_plane")
                            .from(Flight::Table, Flight::PlaneId)
                            .to(Plane::Table, Plane::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Flight::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Flight {
    Table,
    Id,
    Origin,
    Destination,
    DepartureDate,
    ArrivalDate,
    BasePrice,
    StatusId,
    PlaneId,
    CreatedAt,
}
