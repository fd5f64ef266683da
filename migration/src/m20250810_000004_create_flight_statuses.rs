use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FlightStatus::Table)
                    .if_not_exists()
                    .col(pk_auto(FlightStatus::Id))
                    .col(string_len(FlightStatus::Name, 50).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Seed the baseline vocabulary
        let insert = Query::insert()
            .into_table(FlightStatus::Table)
            .columns([FlightStatus::Name])
            .values_panic(["Scheduled".into()])
            .values_panic(["Delayed".into()])
            .values_panic(["Cancelled".into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlightStatus::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FlightStatus {
    Table,
    Id,
    Name,
}
