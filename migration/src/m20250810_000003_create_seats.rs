use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250810_000002_create_planes::Plane;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(SeatClass::Enum)
                    .values([SeatClass::FirstClass, SeatClass::Business, SeatClass::Economy])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(SeatStatus::Enum)
                    .values([SeatStatus::Available, SeatStatus::Taken])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Seat::Table)
                    .if_not_exists()
                    .col(uuid(Seat::Id).primary_key())
                    .col(uuid(Seat::PlaneId).not_null())
                    .col(string_len(Seat::Number, 10).not_null())
                    .col(integer(Seat::Row).not_null())
                    .col(string_len(Seat::Column, 1).not_null())
                    .col(
                        ColumnDef::new(Seat::SeatClass)
                            .custom(SeatClass::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Seat::Status)
                            .custom(SeatStatus::Enum)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seat_plane")
                            .from(Seat::Table, Seat::PlaneId)
                            .to(Plane::Table, Plane::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One seat per (plane, row, column)
        manager
            .create_index(
                Index::create()
                    .name("idx_seat_plane_row_column")
                    .table(Seat::Table)
                    .col(Seat::PlaneId)
                    .col(Seat::Row)
                    .col(Seat::Column)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Seat::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(SeatStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(SeatClass::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Seat {
    Table,
    Id,
    PlaneId,
    Number,
    Row,
    Column,
    SeatClass,
    Status,
}

#[derive(DeriveIden)]
pub enum SeatClass {
    #[sea_orm(iden = "seat_class")]
    Enum,
    #[sea_orm(iden = "first_class")]
    FirstClass,
    #[sea_orm(iden = "business")]
    Business,
    #[sea_orm(iden = "economy")]
    Economy,
}

#[derive(DeriveIden)]
pub enum SeatStatus {
    #[sea_orm(iden = "seat_status")]
    Enum,
    #[sea_orm(iden = "available")]
    Available,
    #[sea_orm(iden = "taken")]
    Taken,
}
