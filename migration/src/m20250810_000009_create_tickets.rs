use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250810_000008_create_reservations::Reservation;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(TicketStatus::Enum)
                    .values([TicketStatus::Active, TicketStatus::Used, TicketStatus::Cancelled])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(uuid(Ticket::Id).primary_key())
                    .col(string_len(Ticket::Barcode, 100).not_null().unique_key())
                    .col(
                        timestamp_with_time_zone(Ticket::IssueDate)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Ticket::Status)
                            .custom(TicketStatus::Enum)
                            .not_null(),
                    )
                    // One ticket per reservation
                    .col(uuid(Ticket::ReservationId).not_null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_reservation")
                            .from(Ticket::Table, Ticket::ReservationId)
                            .to(Reservation::Table, Reservation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(TicketStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Ticket {
    Table,
    Id,
    Barcode,
    IssueDate,
    Status,
    ReservationId,
}

#[derive(DeriveIden)]
pub enum TicketStatus {
    #[sea_orm(iden = "ticket_status")]
    Enum,
    #[sea_orm(iden = "active")]
    Active,
    #[sea_orm(iden = "used")]
    Used,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
