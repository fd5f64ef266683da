use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(DocumentType::Enum)
                    .values([
                        DocumentType::Passport,
                        DocumentType::NationalId,
                        DocumentType::IdCard,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Passenger::Table)
                    .if_not_exists()
                    .col(uuid(Passenger::Id).primary_key())
                    .col(string_len(Passenger::Name, 255).not_null())
                    .col(string_len(Passenger::Document, 50).not_null())
                    .col(
                        ColumnDef::new(Passenger::DocumentType)
                            .custom(DocumentType::Enum)
                            .not_null(),
                    )
                    .col(string_len(Passenger::Email, 255).not_null())
                    .col(string_len(Passenger::Phone, 20).not_null())
                    .col(date(Passenger::BirthDate).not_null())
                    .col(
                        timestamp_with_time_zone(Passenger::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Passenger::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DocumentType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Passenger {
    Table,
    Id,
    Name,
    Document,
    DocumentType,
    Email,
    Phone,
    BirthDate,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum DocumentType {
    #[sea_orm(iden = "document_type")]
    Enum,
    #[sea_orm(iden = "passport")]
    Passport,
    #[sea_orm(iden = "national_id")]
    NationalId,
    #[sea_orm(iden = "id_card")]
    IdCard,
}
