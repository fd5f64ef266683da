use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "seat_class")]
pub enum SeatClass {
    #[sea_orm(string_value = "first_class")]
    FirstClass,
    #[sea_orm(string_value = "business")]
    Business,
    #[sea_orm(string_value = "economy")]
    Economy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "seat_status")]
pub enum SeatStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "taken")]
    Taken,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seat")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plane_id: Uuid,
    /// Human-readable seat code, e.g. "12A".
    pub number: String,
    pub row: i32,
    pub column: String,
    pub seat_class: SeatClass,
    pub status: SeatStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plane::Entity",
        from = "Column::PlaneId",
        to = "super::plane::Column::Id"
    )]
    Plane,
    #[sea_orm(has_one = "super::reservation::Entity")]
    Reservation,
}

impl Related<super::plane::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plane.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
