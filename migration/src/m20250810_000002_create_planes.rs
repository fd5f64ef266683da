use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plane::Table)
                    .if_not_exists()
                    .col(uuid(Plane::Id).primary_key())
                    .col(string_len(Plane::Model, 100).not_null())
                    .col(integer(Plane::Capacity).not_null())
                    .col(integer(Plane::Rows).not_null())
                    .col(integer(Plane::Columns).not_null())
                    .col(
                        timestamp_with_time_zone(Plane::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Plane::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Plane {
    Table,
    Id,
    Model,
    Capacity,
    Rows,
    Columns,
    CreatedAt,
}
