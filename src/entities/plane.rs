use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plane")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub model: String,
    /// Informational only; the real seat count is rows * columns.
    pub capacity: i32,
    pub rows: i32,
    pub columns: i32,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Human-readable description, e.g. "Boeing 737 - Capacity: 180"
    pub fn describe(&self) -> String {
        format!("{} - Capacity: {}", self.model, self.capacity)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::seat::Entity")]
    Seats,
    #[sea_orm(has_many = "super::flight::Entity")]
    Flights,
}

impl Related<super::seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seats.def()
    }
}

impl Related<super::flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flights.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
