use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flight")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_date: DateTimeWithTimeZone,
    pub arrival_date: DateTimeWithTimeZone,
    pub base_price: Decimal,
    pub status_id: i32,
    pub plane_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Duration is derived, never stored.
    pub fn duration_minutes(&self) -> i64 {
        (self.arrival_date.to_utc() - self.departure_date.to_utc()).num_minutes()
    }

    /// Human-readable description, e.g. "EZE → MAD (2025-08-10)"
    pub fn describe(&self) -> String {
        format!(
            "{} → {} ({})",
            self.origin,
            self.destination,
            self.departure_date.date_naive()
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plane::Entity",
        from = "Column::PlaneId",
        to = "super::plane::Column::Id"
    )]
    Plane,
    #[sea_orm(
        belongs_to = "super::flight_status::Entity",
        from = "Column::StatusId",
        to = "super::flight_status::Column::Id"
    )]
    Status,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::flight_staff::Entity")]
    Staff,
}

impl Related<super::plane::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plane.def()
    }
}

impl Related<super::flight_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::flight_staff::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::flight_staff::Relation::Flight.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
