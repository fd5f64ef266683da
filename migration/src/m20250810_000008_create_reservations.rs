use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250810_000001_create_users::User;
use super::m20250810_000003_create_seats::Seat;
use super::m20250810_000005_create_flights::Flight;
use super::m20250810_000007_create_passengers::Passenger;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ReservationStatus::Enum)
                    .values([
                        ReservationStatus::Confirmed,
                        ReservationStatus::Denied,
                        ReservationStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(uuid(Reservation::Id).primary_key())
                    .col(
                        ColumnDef::new(Reservation::Status)
                            .custom(ReservationStatus::Enum)
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone(Reservation::ReservationDate).not_null())
                    .col(decimal_len(Reservation::Price, 10, 2).not_null())
                    .col(
                        string_len(Reservation::ReservationCode, 20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(uuid(Reservation::FlightId).not_null())
                    .col(uuid(Reservation::PassengerId).not_null())
                    .col(uuid(Reservation::SeatId).not_null())
                    .col(uuid(Reservation::CreatedBy).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_flight")
                            .from(Reservation::Table, Reservation::FlightId)
                            .to(Flight::Table, Flight::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_passenger")
                            .from(Reservation::Table, Reservation::PassengerId)
                            .to(Passenger::Table, Passenger::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_seat")
                            .from(Reservation::Table, Reservation::SeatId)
                            .to(Seat::Table, Seat::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_created_by")
                            .from(Reservation::Table, Reservation::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one confirmed reservation per seat; cancelled and denied
        // rows stay behind without blocking a rebooking
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_reservation_confirmed_seat \
                 ON reservation (seat_id) WHERE status = 'confirmed'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservation::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ReservationStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Reservation {
    Table,
    Id,
    Status,
    ReservationDate,
    Price,
    ReservationCode,
    FlightId,
    PassengerId,
    SeatId,
    CreatedBy,
}

#[derive(DeriveIden)]
pub enum ReservationStatus {
    #[sea_orm(iden = "reservation_status")]
    Enum,
    #[sea_orm(iden = "confirmed")]
    Confirmed,
    #[sea_orm(iden = "denied")]
    Denied,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
