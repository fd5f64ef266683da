use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_type")]
pub enum DocumentType {
    #[sea_orm(string_value = "passport")]
    Passport,
    #[sea_orm(string_value = "national_id")]
    NationalId,
    #[sea_orm(string_value = "id_card")]
    IdCard,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "passenger")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub document_type: DocumentType,
    pub email: String,
    pub phone: String,
    pub birth_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Human-readable description, e.g. "Jane Doe (X1234567)"
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.document)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
